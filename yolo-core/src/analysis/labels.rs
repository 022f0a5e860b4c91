use std::str::FromStr;

use serde::Serialize;

/// Object classes of the Pascal VOC detection challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Label {
    Aeroplane,
    Bicycle,
    Bird,
    Boat,
    Bottle,
    Bus,
    Car,
    Cat,
    Chair,
    Cow,
    DiningTable,
    Dog,
    Horse,
    Motorbike,
    Person,
    PottedPlant,
    Sheep,
    Sofa,
    Train,
    TvMonitor,
}

impl Label {
    pub const ALL: [Label; 20] = [
        Label::Aeroplane,
        Label::Bicycle,
        Label::Bird,
        Label::Boat,
        Label::Bottle,
        Label::Bus,
        Label::Car,
        Label::Cat,
        Label::Chair,
        Label::Cow,
        Label::DiningTable,
        Label::Dog,
        Label::Horse,
        Label::Motorbike,
        Label::Person,
        Label::PottedPlant,
        Label::Sheep,
        Label::Sofa,
        Label::Train,
        Label::TvMonitor,
    ];

    /// Name as written in VOC annotation files.
    pub const fn name(&self) -> &'static str {
        match self {
            Label::Aeroplane => "aeroplane",
            Label::Bicycle => "bicycle",
            Label::Bird => "bird",
            Label::Boat => "boat",
            Label::Bottle => "bottle",
            Label::Bus => "bus",
            Label::Car => "car",
            Label::Cat => "cat",
            Label::Chair => "chair",
            Label::Cow => "cow",
            Label::DiningTable => "diningtable",
            Label::Dog => "dog",
            Label::Horse => "horse",
            Label::Motorbike => "motorbike",
            Label::Person => "person",
            Label::PottedPlant => "pottedplant",
            Label::Sheep => "sheep",
            Label::Sofa => "sofa",
            Label::Train => "train",
            Label::TvMonitor => "tvmonitor",
        }
    }

    pub const fn idx(&self) -> usize {
        *self as usize
    }

    pub const fn color(&self) -> [u8; 3] {
        match self {
            Label::Aeroplane => [128, 0, 0],
            Label::Bicycle => [0, 128, 0],
            Label::Bird => [128, 128, 0],
            Label::Boat => [0, 0, 128],
            Label::Bottle => [128, 0, 128],
            Label::Bus => [0, 128, 128],
            Label::Car => [128, 128, 128],
            Label::Cat => [64, 0, 0],
            Label::Chair => [192, 0, 0],
            Label::Cow => [64, 128, 0],
            Label::DiningTable => [192, 128, 0],
            Label::Dog => [64, 0, 128],
            Label::Horse => [192, 0, 128],
            Label::Motorbike => [64, 128, 128],
            Label::Person => [192, 128, 128],
            Label::PottedPlant => [0, 64, 0],
            Label::Sheep => [128, 64, 0],
            Label::Sofa => [0, 192, 0],
            Label::Train => [128, 192, 0],
            Label::TvMonitor => [0, 64, 128],
        }
    }

    pub const fn label_size() -> usize {
        Self::ALL.len()
    }
}

impl FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .find(|label| label.name() == name)
            .copied()
            .ok_or_else(|| format!("unknown VOC label `{}`", s))
    }
}

impl TryFrom<usize> for Label {
    type Error = usize;

    fn try_from(idx: usize) -> Result<Self, Self::Error> {
        Self::ALL.get(idx).copied().ok_or(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_index_roundtrip() {
        assert_eq!(Label::label_size(), 20);
        for (i, label) in Label::ALL.iter().enumerate() {
            assert_eq!(label.idx(), i);
            assert_eq!(Label::try_from(i), Ok(*label));
        }
        assert_eq!(Label::try_from(20), Err(20));
    }

    #[test]
    fn test_label_from_name() {
        assert_eq!("dog".parse::<Label>(), Ok(Label::Dog));
        assert_eq!(" Person ".parse::<Label>(), Ok(Label::Person));
        assert_eq!("tvmonitor".parse::<Label>(), Ok(Label::TvMonitor));
        assert!("unicorn".parse::<Label>().is_err());
    }
}

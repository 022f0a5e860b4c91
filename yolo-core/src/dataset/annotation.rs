use std::fmt;
use std::path::Path;

use serde::Deserialize;
use snafu::{OptionExt, ResultExt, ensure};
use tracing::*;

use crate::{
    analysis::{bbox::Rectangle, labels::Label, point::Point},
    config::AnnotationConfig,
    error::*,
};

/// A coordinate as found in annotation dumps: VOC XML converted to JSON
/// keeps every number as a string, hand-written files use plain numbers.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Coord {
    Number(f64),
    Text(String),
}

impl Coord {
    /// Numeric value of the coordinate.
    ///
    /// # Errors
    /// `InvalidCoordinate` when the text is not a number or the value is NaN
    /// or infinite.
    pub fn value(&self, field: &str) -> Result<f64, YoloError> {
        let value = match self {
            Coord::Number(v) => Some(*v),
            Coord::Text(raw) => raw.trim().parse::<f64>().ok(),
        };

        value
            .filter(|v| v.is_finite())
            .context(InvalidCoordinateSnafu {
                field,
                value: self.to_string(),
            })
    }

    /// Value as a pixel count: finite, non-negative and integral.
    pub fn pixels(&self, field: &str) -> Result<u32, YoloError> {
        let value = self.value(field)?;
        ensure!(
            value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64,
            InvalidCoordinateSnafu {
                field,
                value: self.to_string(),
            }
        );
        Ok(value as u32)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coord::Number(v) => write!(f, "{}", v),
            Coord::Text(raw) => write!(f, "{}", raw),
        }
    }
}

/// Single element or list; VOC-to-dict converters collapse one-object lists.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> From<OneOrMany<T>> for Vec<T> {
    fn from(value: OneOrMany<T>) -> Self {
        match value {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    OneOrMany::deserialize(deserializer).map(Vec::from)
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageSize {
    pub width: Coord,
    pub height: Coord,
    pub depth: Option<Coord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BndBox {
    pub xmin: Coord,
    pub ymin: Coord,
    pub xmax: Coord,
    pub ymax: Coord,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VocObject {
    pub name: String,
    #[serde(default, alias = "bndbox")]
    pub bbox: Option<BndBox>,
    #[serde(default)]
    pub difficult: Option<Coord>,
    #[serde(default)]
    pub truncated: Option<Coord>,
}

impl VocObject {
    pub fn label(&self) -> Option<Label> {
        self.name.parse().ok()
    }

    pub fn is_difficult(&self) -> bool {
        self.difficult
            .as_ref()
            .and_then(|d| d.value("difficult").ok())
            .is_some_and(|d| d != 0.0)
    }
}

/// Annotation of one VOC image.
#[derive(Debug, Clone, Deserialize)]
pub struct VocAnnotation {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size: Option<ImageSize>,
    #[serde(default, alias = "object", deserialize_with = "one_or_many")]
    pub objects: Vec<VocObject>,
}

impl VocAnnotation {
    /// Parses an annotation from JSON, with or without the outer
    /// `annotation` object.
    pub fn from_json_str(raw: &str, origin: &str) -> Result<Self, YoloError> {
        let mut document: serde_json::Value =
            serde_json::from_str(raw).context(AnnotationParseSnafu { path: origin })?;

        // torchvision targets wrap everything in `{"annotation": {...}}`
        let annotation = if document.get("annotation").is_some() {
            document["annotation"].take()
        } else {
            document
        };

        serde_json::from_value(annotation).context(AnnotationParseSnafu { path: origin })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, YoloError> {
        let path = path.as_ref();
        info!("Loading annotation from {}", path.display());

        let raw = std::fs::read_to_string(path).context(AnnotationReadSnafu {
            path: path.to_string_lossy(),
        })?;
        Self::from_json_str(&raw, &path.to_string_lossy())
    }

    /// Image `(width, height)` when the annotation records it.
    pub fn image_size(&self) -> Result<Option<(u32, u32)>, YoloError> {
        let Some(size) = &self.size else {
            return Ok(None);
        };
        let width = size.width.pixels("width")?;
        let height = size.height.pixels("height")?;
        Ok(Some((width, height)))
    }
}

/// Converts every annotated object into a `(name, rectangle)` pair.
///
/// Rectangles are built from the `xmin/ymin` and `xmax/ymax` corners. With
/// `legacy_corner_bug` set the bottom-right corner is `(ymax, ymax)`, which
/// reproduces boxes converted by earlier tooling.
pub fn annos_to_rects(
    annos: &VocAnnotation,
    config: &AnnotationConfig,
) -> Result<Vec<(String, Rectangle)>, YoloError> {
    let mut rects = Vec::with_capacity(annos.objects.len());

    for object in &annos.objects {
        let bbox = object.bbox.as_ref().context(MissingBboxSnafu {
            name: object.name.as_str(),
        })?;

        let xmin = bbox.xmin.value("xmin")?;
        let ymin = bbox.ymin.value("ymin")?;
        let xmax = bbox.xmax.value("xmax")?;
        let ymax = bbox.ymax.value("ymax")?;

        let bottom_right = if config.legacy_corner_bug {
            Point::new(ymax, ymax)
        } else {
            Point::new(xmax, ymax)
        };
        let rect = Rectangle::from_corners(Point::new(xmin, ymin), bottom_right);
        rects.push((object.name.clone(), rect));
    }

    debug!(
        "Converted {} objects of `{}` to rectangles",
        rects.len(),
        annos.filename
    );
    Ok(rects)
}

use std::path::Path;

use serde::Deserialize;
use snafu::ResultExt;
use tracing::*;

use crate::{consts::*, error::*};

/// Settings read once at startup and handed to every component that needs
/// them.
///
/// All sections are optional. Tables without a typed section (a `[model]`
/// layer list or `[dataset]` paths, for instance) are kept verbatim and
/// reachable with [`Config::get`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub grid: GridConfig,
    pub render: RenderConfig,
    pub annotations: AnnotationConfig,
    #[serde(flatten)]
    pub extra: toml::Table,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub cols: u32,
    pub rows: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: DEFAULT_GRID_COLS,
            rows: DEFAULT_GRID_ROWS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub draw_midpoint: bool,
    pub thickness: u32,
    pub grid_color: [u8; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            draw_midpoint: true,
            thickness: BOUNDING_BOX_THICKNESS,
            grid_color: GRID_LINE_COLOR,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Build the bottom-right corner from `(ymax, ymax)` instead of
    /// `(xmax, ymax)`.
    ///
    /// Older label dumps were converted this way. Only enable it to reproduce
    /// boxes produced by that conversion.
    pub legacy_corner_bug: bool,
}

impl Config {
    /// Loads a TOML config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, YoloError> {
        let path = path.as_ref();
        info!("Loading config from {}", path.display());

        let raw = std::fs::read_to_string(path).context(ConfigReadSnafu {
            path: path.to_string_lossy(),
        })?;
        let config = Self::parse(&raw, &path.to_string_lossy())?;

        debug!("Loaded config: {:?}", config);
        Ok(config)
    }

    /// Parses TOML text. `origin` only names the source in errors.
    pub fn parse(raw: &str, origin: &str) -> Result<Self, YoloError> {
        let config: Self = toml::from_str(raw).context(ConfigParseSnafu { path: origin })?;
        config.warn_if_invalid();
        Ok(config)
    }

    /// Looks up a value outside the known sections by dotted key, such as
    /// `"model.layers"`.
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        let mut parts = key.split('.');
        let mut value = self.extra.get(parts.next()?)?;
        for part in parts {
            value = value.as_table()?.get(part)?;
        }
        Some(value)
    }

    fn warn_if_invalid(&self) {
        if self.grid.cols == 0 || self.grid.rows == 0 {
            warn!(
                "config: grid {}x{} has an empty dimension; grid generation will fail",
                self.grid.cols, self.grid.rows
            );
        }
        if self.render.thickness == 0 {
            warn!("config: render.thickness is 0; bounding boxes will not be visible");
        }
        if self.annotations.legacy_corner_bug {
            warn!("config: annotations.legacy_corner_bug is on; xmax is ignored");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::parse("", "<empty>").unwrap();
        assert_eq!(config.grid.cols, 7);
        assert_eq!(config.grid.rows, 7);
        assert!(config.render.draw_midpoint);
        assert_eq!(config.render.thickness, 2);
        assert_eq!(config.render.grid_color, [127, 127, 127]);
        assert!(!config.annotations.legacy_corner_bug);
        assert!(config.extra.is_empty());
    }

    #[test]
    fn test_config_sections_and_extra_keys() {
        let raw = r#"
            name = "yolo-v1"

            [grid]
            cols = 13

            [render]
            draw_midpoint = false

            [annotations]
            legacy_corner_bug = true

            [dataset]
            root = "data/VOCdevkit"
            year = "2007"

            [model]
            input_size = 448

            [[model.layers]]
            type = "conv"
            filters = 64

            [[model.layers]]
            type = "maxpool"
        "#;
        let config = Config::parse(raw, "inline").unwrap();

        assert_eq!(config.grid.cols, 13);
        // Missing keys inside a present section keep their default
        assert_eq!(config.grid.rows, 7);
        assert!(!config.render.draw_midpoint);
        assert_eq!(config.render.thickness, 2);
        assert!(config.annotations.legacy_corner_bug);

        assert_eq!(config.get("name").and_then(|v| v.as_str()), Some("yolo-v1"));
        assert_eq!(
            config.get("model.input_size").and_then(|v| v.as_integer()),
            Some(448)
        );
        let layers = config.get("model.layers").and_then(|v| v.as_array()).unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].get("type").and_then(|v| v.as_str()), Some("maxpool"));

        assert_eq!(
            config.get("dataset.root").and_then(|v| v.as_str()),
            Some("data/VOCdevkit")
        );
        assert_eq!(config.get("dataset.year").and_then(|v| v.as_str()), Some("2007"));

        assert!(config.get("model.missing").is_none());
        assert!(config.get("name.deeper").is_none());
        assert!(config.get("grid").is_none());
    }

    #[test]
    fn test_config_parse_error() {
        let err = Config::parse("[grid]\ncols = \"seven\"", "bad.toml").unwrap_err();
        assert!(matches!(err, YoloError::ConfigParse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_config_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("default.toml");
        std::fs::write(&path, "[grid]\ncols = 5\nrows = 3\n").unwrap();

        let config = Config::from_path(&path).unwrap();
        assert_eq!((config.grid.cols, config.grid.rows), (5, 3));

        let missing = Config::from_path(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(missing, YoloError::ConfigRead { .. }));
    }
}

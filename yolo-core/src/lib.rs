pub mod analysis;
pub mod config;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod render;

// Re-export commonly used types
pub use analysis::{Grid, GridCell, Label, Point, Rectangle, generate_grid};
pub use config::Config;
pub use error::YoloError;

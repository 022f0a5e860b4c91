pub mod bbox;
pub mod grid;
pub mod labels;
pub mod point;

pub use bbox::Rectangle;
pub use grid::{Grid, GridCell, generate_grid};
pub use labels::Label;
pub use point::Point;

pub mod annotation;

pub use annotation::{VocAnnotation, VocObject, annos_to_rects};

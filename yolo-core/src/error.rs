use snafu::prelude::*;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum YoloError {
    #[snafu(display("Invalid rectangle dimension {}x{}", width, height))]
    InvalidDimension { width: f64, height: f64 },
    #[snafu(display(
        "Invalid grid {}x{} for image {}x{}",
        cols,
        rows,
        image_width,
        image_height
    ))]
    InvalidGridSpecification {
        image_width: u32,
        image_height: u32,
        cols: u32,
        rows: u32,
    },
    #[snafu(display("IoU undefined: union area of both rectangles is zero"))]
    DegenerateGeometry,
    #[snafu(display("Read config `{}` error: {}", path, source))]
    ConfigRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Parse config `{}` error: {}", path, source))]
    ConfigParse {
        source: toml::de::Error,
        path: String,
    },
    #[snafu(display("Read annotation `{}` error: {}", path, source))]
    AnnotationRead {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Parse annotation `{}` error: {}", path, source))]
    AnnotationParse {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Annotation field `{}` is not a number: `{}`", field, value))]
    InvalidCoordinate { field: String, value: String },
    #[snafu(display("Annotation object `{}` has no bbox", name))]
    MissingBbox { name: String },
    #[snafu(display("Image Open `{}` error: {}", path, source))]
    ImageOpen {
        source: image::ImageError,
        path: String,
    },
    #[snafu(display("Image Write `{}` error: {}", path, source))]
    ImageWrite {
        source: image::ImageError,
        path: String,
    },
}

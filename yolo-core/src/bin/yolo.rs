use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use yolo_core::analysis::{Grid, Point, Rectangle};
use yolo_core::config::Config;
use yolo_core::consts::LOG_ENV_NAME;
use yolo_core::dataset::{VocAnnotation, annos_to_rects};
use yolo_core::render::{self, DrawOptions};

#[derive(Parser)]
#[command(name = "yolo")]
#[command(about = "Bounding box and grid tooling for YOLO-style detection")]
struct Args {
    #[arg(long, global = true, help = "TOML config file")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[arg(
        short,
        long,
        global = true,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draw the annotated bounding boxes of an image
    Draw {
        #[arg(long, help = "Input image path")]
        image: PathBuf,

        #[arg(long, help = "VOC annotation as JSON")]
        annotations: PathBuf,

        #[arg(short, long, help = "Output image path")]
        output: PathBuf,
    },
    /// Split an image into a grid and draw the cell boundaries
    Grid {
        #[arg(long, help = "Input image path")]
        image: PathBuf,

        #[arg(short, long, help = "Output image path")]
        output: PathBuf,

        #[arg(long, help = "Number of columns, overrides the config")]
        cols: Option<u32>,

        #[arg(long, help = "Number of rows, overrides the config")]
        rows: Option<u32>,
    },
    /// Overlap of two center-format rectangles
    #[command(allow_negative_numbers = true)]
    Iou {
        cx1: f64,
        cy1: f64,
        w1: f64,
        h1: f64,
        cx2: f64,
        cy2: f64,
        w2: f64,
        h2: f64,
    },
}

fn init_tracing(args: &Args) {
    let level = if args.verbose {
        "debug"
    } else {
        args.log_level.as_str()
    };

    let filter = EnvFilter::try_from_env(LOG_ENV_NAME).unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            debug!("No config given, using defaults");
            Ok(Config::default())
        }
    }
}

fn draw(config: &Config, image: &Path, annotations: &Path, output: &Path) -> Result<()> {
    let mut canvas = render::open_image(image)?;
    let annos = VocAnnotation::from_path(annotations)?;

    if let Some((width, height)) = annos.image_size()? {
        if (width, height) != canvas.dimensions() {
            warn!(
                "Annotation is for a {}x{} image, {} is {}x{}",
                width,
                height,
                image.display(),
                canvas.width(),
                canvas.height()
            );
        }
    }

    let rects = annos_to_rects(&annos, &config.annotations)
        .with_context(|| format!("invalid annotation {}", annotations.display()))?;
    info!("Drawing {} objects", rects.len());

    render::draw_labeled_bboxes(&mut canvas, &rects, &DrawOptions::from(&config.render));
    render::save_image(&canvas, output)?;
    Ok(())
}

fn grid(
    config: &Config,
    image: &Path,
    output: &Path,
    cols: Option<u32>,
    rows: Option<u32>,
) -> Result<()> {
    let mut canvas = render::open_image(image)?;
    let (width, height) = canvas.dimensions();
    let cols = cols.unwrap_or(config.grid.cols);
    let rows = rows.unwrap_or(config.grid.rows);

    let grid = Grid::generate(width, height, cols, rows)?;
    info!(
        "Generated {}x{} grid with {} cells covering {} of {} pixels",
        cols,
        rows,
        grid.cells().len(),
        grid.covered_pixels(),
        width as u64 * height as u64
    );

    render::draw_grid(&mut canvas, &grid, config.render.grid_color);
    render::save_image(&canvas, output)?;
    Ok(())
}

fn iou(first: Rectangle, second: Rectangle) {
    println!("Rectangle 1: {}", first);
    println!("Rectangle 2: {}", second);
    println!("Intersection: {}", first.intersection_area(&second));
    println!("Union: {}", first.union_area(&second));
    println!("IoU: {:.6}", first.iou(&second));
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args);

    let config = load_config(args.config.as_deref())?;

    match &args.command {
        Command::Draw {
            image,
            annotations,
            output,
        } => draw(&config, image, annotations, output)?,
        Command::Grid {
            image,
            output,
            cols,
            rows,
        } => grid(&config, image, output, *cols, *rows)?,
        Command::Iou {
            cx1,
            cy1,
            w1,
            h1,
            cx2,
            cy2,
            w2,
            h2,
        } => iou(
            Rectangle::new(Point::new(*cx1, *cy1), *w1, *h1, 1.0),
            Rectangle::new(Point::new(*cx2, *cy2), *w2, *h2, 1.0),
        ),
    }

    Ok(())
}

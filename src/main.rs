use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};

use screen_mapper::background::{ImagePayload, ImageSource};
use screen_mapper::contract;
use screen_mapper::domain::{CanvasDimensions, DisplaySize, ScreenPoint};
use screen_mapper::host::{
    COORDINATES_SLOT, DisplayHost, MenuHost, OverlaySink, POINTS_STORE_SLOT, SlotStore,
    ViewportSource,
};
use screen_mapper::render::OverlayScene;
use screen_mapper::render::image::rasterize;
use screen_mapper::viewport::HostTransform;
use screen_mapper::{MapperConfig, Session};

/// Screen mapper CLI
///
/// Examples:
///   screen-mapper render -o overlay.png                         # Default layout on a blank canvas
///   screen-mapper render -i shot.png -p '[{"x":10,"y":10}]' -o out.png
///   screen-mapper info -p '[[60,60],[340,60],[340,340],[60,340]]'
#[derive(Parser, Debug)]
#[clap(
    name = "screen-mapper",
    version,
    about = "Four-point calibration overlay tools"
)]
struct Cli {
    /// Config file to use instead of the user config
    #[clap(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the overlay for a stored point set to PNG
    Render {
        /// Stored `points_store` value; empty means the default layout
        #[clap(long, short = 'p', default_value = "")]
        points: String,
        /// Background image file
        #[clap(long, short = 'i')]
        image: Option<PathBuf>,
        /// Canvas width when no image is given
        #[clap(long)]
        width: Option<u32>,
        /// Canvas height when no image is given
        #[clap(long)]
        height: Option<u32>,
        /// Output PNG path
        #[clap(long, short = 'o')]
        output: PathBuf,
    },
    /// Print the downstream coordinates and a point summary
    Info {
        /// Stored `points_store` or `coordinates` value
        #[clap(long, short = 'p')]
        points: String,
        /// Canvas size the points were placed on, as WIDTHxHEIGHT
        #[clap(long, value_parser = parse_size)]
        canvas: Option<CanvasDimensions>,
        /// Reference image size, as WIDTHxHEIGHT
        #[clap(long, value_parser = parse_size)]
        image: Option<CanvasDimensions>,
        /// Rescale points from canvas to image size
        #[clap(long)]
        normalize: bool,
    },
}

fn parse_size(raw: &str) -> Result<CanvasDimensions, String> {
    let (w, h) = raw
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let width = w.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let height = h.trim().parse::<u32>().map_err(|e| e.to_string())?;
    if width == 0 || height == 0 {
        return Err("size must be non-zero".to_string());
    }
    Ok(CanvasDimensions::new(width, height))
}

/// In-memory host for one-shot command line runs
#[derive(Default)]
struct HeadlessHost {
    slots: HashMap<String, String>,
}

impl HeadlessHost {
    fn new() -> Self {
        let mut slots = HashMap::new();
        slots.insert(POINTS_STORE_SLOT.to_string(), String::new());
        slots.insert(COORDINATES_SLOT.to_string(), String::new());
        Self { slots }
    }
}

impl SlotStore for HeadlessHost {
    fn slot(&self, name: &str) -> Option<String> {
        self.slots.get(name).cloned()
    }

    fn commit_slots(&mut self, points_store: String, coordinates: String) {
        self.slots.insert(POINTS_STORE_SLOT.to_string(), points_store);
        self.slots.insert(COORDINATES_SLOT.to_string(), coordinates);
    }

    fn store_image(&mut self, _payload: Option<&ImagePayload>) {}
}

impl DisplayHost for HeadlessHost {
    fn resize_display(&mut self, size: DisplaySize) {
        log::debug!("Display area {}x{}", size.width, size.height);
    }
}

impl OverlaySink for HeadlessHost {
    fn present(&mut self, _scene: &OverlayScene) {}
}

impl MenuHost for HeadlessHost {
    fn open_context_menu(&mut self, _at: ScreenPoint) {}
    fn close_context_menu(&mut self) {}
    fn pick_image_file(&mut self) {}
}

impl ViewportSource for HeadlessHost {
    fn transform(&self) -> HostTransform {
        HostTransform::default()
    }
}

fn read_image(path: &Path) -> anyhow::Result<ImageSource> {
    let format = image::ImageFormat::from_path(path)
        .with_context(|| format!("unknown image format for {}", path.display()))?;
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageSource::File {
        name,
        last_modified: 0,
        mime_type: format.to_mime_type().to_string(),
        bytes,
    })
}

fn render(
    config: MapperConfig,
    points: &str,
    image: Option<&Path>,
    size: (Option<u32>, Option<u32>),
    output: &Path,
) -> anyhow::Result<()> {
    let defaults = config.default_dimensions();
    let dims = CanvasDimensions::new(
        size.0.unwrap_or(defaults.width),
        size.1.unwrap_or(defaults.height),
    );
    let mut session = Session::with_dimensions(HeadlessHost::new(), config, dims)?;

    if let Some(path) = image
        && !session.load_image(read_image(path)?)
    {
        bail!("could not load image {}", path.display());
    }
    // Points go in after the image so a size change does not discard them
    session.restore(points, None);

    let scene = session.scene();
    let overlay = rasterize(&scene, session.image().map(|img| &img.rgba));
    overlay
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "{} ({}x{}, {})",
        output.display(),
        scene.dimensions.width,
        scene.dimensions.height,
        scene.status.describe()
    );
    Ok(())
}

/// Pixels in an image, without overflowing for large sizes
fn pixel_count(dims: CanvasDimensions) -> u64 {
    u64::from(dims.width) * u64::from(dims.height)
}

fn info(
    config: MapperConfig,
    points: &str,
    canvas: Option<CanvasDimensions>,
    image: Option<CanvasDimensions>,
    normalize: bool,
) {
    let canvas = canvas.unwrap_or_else(|| config.default_dimensions());
    let image = image.unwrap_or(canvas);
    let selection = contract::resolve(points, canvas, image, normalize);
    let covered = selection.mask.pixels().filter(|p| p.0[0] > 0).count();

    println!("coordinates: {}", selection.four_points);
    println!("points:      {}", selection.point_info);
    println!(
        "mask:        {} of {} pixels",
        covered,
        pixel_count(image)
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => MapperConfig::load_from(path)?,
        None => MapperConfig::load(),
    };

    match cli.command {
        Command::Render {
            points,
            image,
            width,
            height,
            output,
        } => render(config, &points, image.as_deref(), (width, height), &output),
        Command::Info {
            points,
            canvas,
            image,
            normalize,
        } => {
            info(config, &points, canvas, image, normalize);
            Ok(())
        }
    }
}

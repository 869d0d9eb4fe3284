use std::convert::TryFrom;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{ error, info };

use sphere_tracer::{ render_frame, FrameConfig, Result, Scene, ShadingMode };
use sphere_tracer::consts::{ NUM_THREADS, OUT_FILE, LIGHT_SLIDER_SCALE };

/// Render one frame of a sphere scene to a PPM image.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Output width in pixels
    #[clap(long)]
    width: Option<usize>,

    /// Output height in pixels
    #[clap(long)]
    height: Option<usize>,

    /// Light x position in slider units (tenths of a scene unit)
    #[clap(long, allow_hyphen_values = true)]
    light_x: Option<f64>,

    /// Maximum number of mirror bounces
    #[clap(long)]
    bounces: Option<usize>,

    /// 0 = Phong, 1 = +shadow, 2 = +reflection, 3 = +shadow +reflection
    #[clap(long)]
    mode: Option<i64>,

    /// JSON scene description; the built-in scene is used if omitted
    #[clap(long)]
    scene: Option<PathBuf>,

    /// JSON frame configuration; flags override its values
    #[clap(long)]
    config: Option<PathBuf>,

    /// Number of render threads
    #[clap(long, default_value_t = NUM_THREADS)]
    threads: usize,

    /// Where to write the PPM image
    #[clap(short, long, default_value = OUT_FILE)]
    output: PathBuf,
}

fn frame_config(args: &Args) -> Result<FrameConfig> {
    let mut config = match &args.config {
        Some(path) => FrameConfig::load(path)?,
        None => FrameConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(slider) = args.light_x {
        config.light_position.x = slider / LIGHT_SLIDER_SCALE;
    }
    if let Some(bounces) = args.bounces {
        config.bounce_limit = bounces;
    }
    if let Some(code) = args.mode {
        config.shading_mode = ShadingMode::try_from(code)?;
    }

    Ok(config)
}

fn run(args: Args) -> Result<()> {
    let scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::default(),
    };
    let config = frame_config(&args)?;

    let canvas = render_frame(&scene, config, args.threads)?;
    canvas.save(&args.output)?;
    info!("Saved render to {:?}.", args.output);

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info")
    ).init();

    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        process::exit(1);
    }
}

mod app;

use std::path::PathBuf;

use barn_frustum::config::SceneConfig;
use clap::Parser;
use log::info;

const WIDTH: u32  = 800;
const HEIGHT: u32 = 800;

#[derive(Parser)]
#[command(name = "barn_frustum")]
#[command(about = "Renders the frustum wireframe of barn light filters")]
struct Cli {
    /// Scene description (TOML), a single lit filter is drawn when omitted
    #[arg(short = 'p', long)]
    scene: Option<PathBuf>,

    /// Where to save the rendered image
    #[arg(short, long, default_value = "barn_frustum.png")]
    output: PathBuf,

    /// Don't save the image, only useful together with --show
    #[arg(long)]
    no_save: bool,

    /// Open a window with the result, Escape closes it
    #[arg(short, long)]
    show: bool,

    #[arg(long, default_value_t = WIDTH, value_parser = clap::value_parser!(u32).range(1..))]
    width: u32,

    #[arg(long, default_value_t = HEIGHT, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[show_image::main]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let scene = match &cli.scene {
        Some(path) => {
            info!("loading scene from {}", path.display());
            SceneConfig::from_file(path)?
        }
        None => SceneConfig::default(),
    };

    let context = app::Context {
        width: cli.width,
        height: cli.height,
        output: match cli.no_save {
            true => None,
            false => Some(cli.output),
        },
        show: cli.show,
        scene,
    };

    app::run(context)?;

    return Ok(());
}

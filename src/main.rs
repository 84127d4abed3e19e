//! glyphgate CLI - Show a random sci-fi image as an ASCII art login screen

use clap::Parser;
use glyphgate::gallery::{self, DEFAULT_ART_DIR, DEFAULT_WIDTH};
use glyphgate::{ArtGallery, GlyphgateError, LoginScreen};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "glyphgate", about = "Display a random sci-fi ASCII art login screen")]
struct Args {
    /// Directory containing your sci-fi art images
    #[arg(long, default_value = DEFAULT_ART_DIR)]
    art_dir: PathBuf,
    /// Width (in characters) for the ASCII art
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(screen) => {
            println!("{screen}\n");
            ExitCode::SUCCESS
        }
        Err(err @ (GlyphgateError::MissingArtDir(_) | GlyphgateError::NoImages(_))) => {
            println!("{err}\n");
            print!("{}", gallery::prompt_help());
            ExitCode::FAILURE
        }
        Err(err) => {
            println!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<LoginScreen, GlyphgateError> {
    let gallery = ArtGallery::open(&args.art_dir)?;
    let image = gallery.choose(&mut rand::thread_rng());
    log::debug!("selected {}", image.display());
    LoginScreen::load(image, args.width)
}

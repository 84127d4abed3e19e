//! glyphwave - Animate an image as flickering ASCII art until a key is pressed

use clap::Parser;
use glyphgate::loader::{self, ANIMATION_HEIGHT, ANIMATION_WIDTH};
use glyphgate::{Animator, CancelToken, GlyphgateError, KeyWatcher};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "glyphwave", about = "ASCII art animation")]
struct Args {
    /// Path to the image file
    image_path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let image = match loader::open_luma(&args.image_path)
        .and_then(|gray| loader::fit_fixed(&gray, ANIMATION_WIDTH, ANIMATION_HEIGHT))
    {
        Ok(image) => image,
        Err(GlyphgateError::Decode { source, .. }) => {
            println!("Error loading image: {source}");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            println!("Error loading image: {e}");
            return ExitCode::FAILURE;
        }
    };

    match animate(image) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn animate(image: image::GrayImage) -> Result<(), GlyphgateError> {
    let token = CancelToken::new();

    // SIGINT/SIGTERM unwind through the same path as a keypress
    let on_signal = token.clone();
    ctrlc::set_handler(move || on_signal.cancel())
        .map_err(|e| GlyphgateError::Terminal(e.to_string()))?;

    let watcher = KeyWatcher::spawn(token.clone())?;
    let result = Animator::new(image).run_to_stdout(&token);

    // make sure the watcher sees the stop even if the loop failed
    token.cancel();
    if let Err(e) = watcher.join() {
        // no terminal to read keys from; the loop only stopped on a signal
        log::warn!("key watcher: {e}");
    }
    result.map(|_| ())
}

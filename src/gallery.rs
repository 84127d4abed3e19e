//! Art directory scanning and the static login screen.

use crate::frame::{self, Frame};
use crate::loader;
use crate::palette::LinearPalette;
use crate::{GlyphgateError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::path::{Path, PathBuf};

pub const DEFAULT_ART_DIR: &str = "sci_fi_art";
pub const DEFAULT_WIDTH: u32 = 100;

/// Extensions accepted in the art directory, compared case-insensitively.
pub const SUPPORTED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

pub const DEFAULT_CAPTION: &str = "Welcome, futuristic wanderer. Enjoy the view of tomorrow.";

const CAPTIONS: [(&str, &str); 10] = [
    ("image1.png", "Welcome, traveler. The digital realm awaits you."),
    ("cyber_trench.png", "Greetings, cyber renegade. Dive into the code."),
    ("image2.png", "Hello, dreamer. Reality is what you make of it."),
    ("neon_night.png", "Welcome, night walker. Let the neon lights guide you."),
    ("matrix_code.png", "Hello, Neo. Follow the code."),
    ("space_dock.png", "Greetings, explorer. The cosmos beckons."),
    ("virtual_landscape.png", "Welcome, architect of dreams. Build your world."),
    ("cyber_face.png", "Hello, visionary. See the future through digital eyes."),
    ("futuristic_skyline.png", "Greetings, skybound wanderer. Your journey begins here."),
    ("rebel_hideout.png", "Welcome, rebel. The resistance awaits your command."),
];

/// Image generation prompts suggested when there is no art to show.
pub const PROMPTS: [&str; 10] = [
    "A futuristic cityscape with neon lights in a rainy cyberpunk style reminiscent of The Matrix.",
    "An abstract digital landscape with glitch effects and holographic elements, cyberpunk art.",
    "A lone figure in a trench coat walking down a rain-soaked street illuminated by neon signs, cyber noir.",
    "A dystopian future control room with holographic interfaces and futuristic architecture.",
    "A digital matrix code falling in a green cascade over a dark futuristic cityscape.",
    "An alien spaceship docking at a space station, with vibrant cosmic colors and futuristic design.",
    "A virtual reality landscape with surreal geometric patterns and neon colors.",
    "A cybernetic humanoid face with glowing circuitry and digital overlays in a high-tech style.",
    "A futuristic skyline with flying cars and towering skyscrapers bathed in neon light.",
    "A cyberpunk rebel hideout with graffiti, neon lights, and a mysterious digital aura.",
];

/// Caption for an image file name, exact match on the bare name.
pub fn caption_for(file_name: &str) -> &'static str {
    CAPTIONS
        .iter()
        .find(|(name, _)| *name == file_name)
        .map_or(DEFAULT_CAPTION, |(_, caption)| *caption)
}

/// Numbered prompt list with its header line.
pub fn prompt_help() -> String {
    let mut help = String::from(
        "Please generate sci\u{2011}fi images using one of the following DALL·E prompts and place them in the directory:\n",
    );
    for (i, prompt) in PROMPTS.iter().enumerate() {
        help.push_str(&format!("{}. {}\n", i + 1, prompt));
    }
    help
}

/// Suffix match on the lowercased file name, so a bare `.png` counts too.
pub fn is_supported(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    let name = name.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| {
        name.len() > ext.len() && name.ends_with(ext) && name[..name.len() - ext.len()].ends_with('.')
    })
}

/// Center `text` in `width` columns the way Python's `str.center` pads.
pub fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(margin - left))
}

/// Supported images found in an art directory.
#[derive(Debug)]
pub struct ArtGallery {
    dir: PathBuf,
    images: Vec<PathBuf>,
}

impl ArtGallery {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(GlyphgateError::MissingArtDir(dir.to_path_buf()));
        }
        let mut images = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry in {}: {e}", dir.display());
                    continue;
                }
            };
            let path = entry.path();
            if is_supported(&path) {
                images.push(path);
            }
        }
        if images.is_empty() {
            return Err(GlyphgateError::NoImages(dir.to_path_buf()));
        }
        images.sort();
        log::debug!("{} images in {}", images.len(), dir.display());
        Ok(Self { dir: dir.to_path_buf(), images })
    }

    pub fn images(&self) -> &[PathBuf] {
        &self.images
    }

    /// Pick one image uniformly at random.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &Path {
        // open() guarantees at least one image
        self.images.choose(rng).map_or(self.dir.as_path(), PathBuf::as_path)
    }
}

/// Separator, centered caption, separator, then the art.
#[derive(Debug, Clone)]
pub struct LoginScreen {
    caption: String,
    frame: Frame,
    width: usize,
}

impl LoginScreen {
    pub fn new(caption: impl Into<String>, frame: Frame, width: usize) -> Self {
        Self { caption: caption.into(), frame, width }
    }

    /// Decode `path`, render it `width` columns wide and caption it by file name.
    pub fn load(path: &Path, width: u32) -> Result<Self> {
        let gray = loader::open_luma(path)?;
        let gray = loader::fit_width(&gray, width)?;
        let frame = frame::render_linear(&gray, &LinearPalette::default());
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        Ok(Self::new(caption_for(name), frame, width as usize))
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }
}

impl fmt::Display for LoginScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "=".repeat(self.width);
        writeln!(f, "{separator}")?;
        writeln!(f, "{}", center(&self.caption, self.width))?;
        writeln!(f, "{separator}")?;
        write!(f, "{}", self.frame)
    }
}

//! 8-bit RGB image data for texture lookups.
//!
//! Images are decoded once at scene build time and shared read-only between
//! render threads.

use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a directory searched first for image files.
pub const IMAGE_DIR_ENV: &str = "GLINT_IMAGES";

/// How many `../` levels above the working directory are searched for `images/`.
const PARENT_SEARCH_DEPTH: usize = 6;

const BYTES_PER_PIXEL: usize = 3;

/// Errors that can occur while loading an image.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Image decoding error for {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Image '{0}' not found in any search location")]
    NotFound(String),

    #[error("Pixel buffer of {len} bytes does not match {width}x{height} RGB")]
    BufferSize { width: u32, height: u32, len: usize },
}

/// Row-major, top-to-bottom RGB8 pixels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Image with no pixels; samples as magenta through `ImageTexture`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_rgb8(width: u32, height: u32, data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() != width as usize * height as usize * BYTES_PER_PIXEL {
            return Err(ImageError::BufferSize {
                width,
                height,
                len: data.len(),
            });
        }

        Ok(Self { width, height, data })
    }

    /// Decode the file at `path`.
    pub fn open(path: &Path) -> Result<Self, ImageError> {
        let rgb = image::open(path)
            .map_err(|source| ImageError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();

        let (width, height) = rgb.dimensions();
        Ok(Self {
            width,
            height,
            data: rgb.into_raw(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// RGB bytes at `(x, y)`, coordinates clamped into the image.
    ///
    /// Returns `None` only for an empty image.
    pub fn pixel(&self, x: i64, y: i64) -> Option<[u8; 3]> {
        if self.is_empty() {
            return None;
        }

        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let offset = (y * self.width as usize + x) * BYTES_PER_PIXEL;

        Some([self.data[offset], self.data[offset + 1], self.data[offset + 2]])
    }
}

/// Candidate paths for `name`, in search order.
fn search_paths(name: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(dir) = env::var(IMAGE_DIR_ENV) {
        paths.push(Path::new(&dir).join(name));
    }

    paths.push(PathBuf::from(name));

    let mut prefix = PathBuf::new();
    for _ in 0..=PARENT_SEARCH_DEPTH {
        paths.push(prefix.join("images").join(name));
        prefix.push("..");
    }

    paths
}

/// Locate and decode `name`, trying each search location in turn.
pub fn try_load_image(name: &str) -> Result<ImageData, ImageError> {
    for path in search_paths(name) {
        if !path.is_file() {
            continue;
        }

        match ImageData::open(&path) {
            Ok(image) => {
                log::debug!("Loaded image {} ({}x{})", path.display(), image.width(), image.height());
                return Ok(image);
            }
            Err(e) => log::debug!("Skipping {}: {}", path.display(), e),
        }
    }

    Err(ImageError::NotFound(name.to_string()))
}

/// Like [`try_load_image`], but a missing or unreadable file yields
/// [`ImageData::empty`] and a warning instead of an error.
pub fn load_image(name: &str) -> ImageData {
    try_load_image(name).unwrap_or_else(|e| {
        log::warn!("Couldn't load image file '{}': {}", name, e);
        ImageData::empty()
    })
}

//! Producers of decoded bitmaps.
//!
//! The classifier never decodes images itself. Anything that can hand over an
//! RGBA bitmap, or say why it could not, is an [`ImageSource`].

use std::io::BufRead;
use std::path::Path;

use crate::classifier::{Bitmap, ClassifierError};

/// Supplies one decoded bitmap per call.
pub trait ImageSource {
    /// # Errors
    /// - `UserCancelled` if no image was chosen
    /// - `ImageDecodeError` if the chosen image could not be decoded
    fn pick(&mut self) -> Result<Bitmap, ClassifierError>;
}

/// Decodes an in-memory encoded image (PNG, JPEG, ...) into a bitmap.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, ClassifierError> {
    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}

/// Opens and decodes an image file.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Bitmap, ClassifierError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| {
        ClassifierError::ImageDecodeError(format!("{}: {}", path.display(), e))
    })?;
    log::debug!("Loaded {:?} ({}x{})", path, img.width(), img.height());
    Ok(img.to_rgba8())
}

/// Wraps a raw RGBA8 buffer of `width * height * 4` bytes.
pub fn bitmap_from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Bitmap, ClassifierError> {
    let len = pixels.len();
    Bitmap::from_raw(width, height, pixels).ok_or_else(|| {
        ClassifierError::ValidationError(format!(
            "Pixel buffer of {} bytes is too small for a {}x{} RGBA bitmap",
            len, width, height
        ))
    })
}

/// Reads one image path per line, e.g. from a terminal.
/// A blank line or end of input means the user is done.
pub struct PromptImageSource<R> {
    reader: R,
}

impl<R: BufRead> PromptImageSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> ImageSource for PromptImageSource<R> {
    fn pick(&mut self) -> Result<Bitmap, ClassifierError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(|e| {
            ClassifierError::ImageDecodeError(format!("Failed to read image path: {}", e))
        })?;

        let path = line.trim();
        if read == 0 || path.is_empty() {
            return Err(ClassifierError::UserCancelled);
        }
        load_image(path)
    }
}

use std::path::Path;

use image::GenericImageView;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("cannot decode image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("cannot open viewer: {0}")]
    Launch(#[from] std::io::Error),
}

/// Shows a downloaded photo to the operator.
pub trait ImageViewer: Send + Sync {
    fn show(&self, path: &Path) -> Result<(), ViewerError>;
}

/// Decodes the file to make sure it is an image, then hands it to the desktop's default viewer.
pub struct SystemViewer;

/// Decode an image file and return its dimensions.
pub fn decode_image(path: &Path) -> Result<(u32, u32), ViewerError> {
    let decoded = image::open(path)?;
    Ok(decoded.dimensions())
}

impl ImageViewer for SystemViewer {
    fn show(&self, path: &Path) -> Result<(), ViewerError> {
        let (width, height) = decode_image(path)?;
        tracing::debug!(path = %path.display(), width, height, "Opening image viewer");
        open::that(path)?;
        Ok(())
    }
}

use thiserror::Error;

use crate::capture::CaptureTarget;
use crate::model::PixelRect;

#[derive(Error, Debug)]
pub enum Error {
    /// Zero-width bitmaps, degenerate page geometry or unusable block data.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A slice rectangle does not lie inside its source bitmap.
    #[error("geometry error: {rect} is outside the {width}x{height} bitmap")]
    Geometry {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    #[error("capture of {target} failed: {reason}")]
    Capture {
        target: CaptureTarget,
        reason: String,
    },

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

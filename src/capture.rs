use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::model::{BitmapSource, SourceBitmap};

/// Region a capture provider is asked to rasterize. The target is always
/// passed explicitly, so no render state has to be redirected between captures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CaptureTarget {
    Header,
    Content,
    Summary,
}

impl fmt::Display for CaptureTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CaptureTarget::Header => "header",
            CaptureTarget::Content => "content",
            CaptureTarget::Summary => "summary",
        })
    }
}

pub struct Capture {
    pub bitmap: SourceBitmap,
    /// Width of the surface the bitmap was rasterized from, in its own pixels.
    pub surface_width_px: u32,
}

pub trait CaptureProvider {
    fn capture(&mut self, target: CaptureTarget) -> Result<Capture, Error>;
}

/// Everything the pagination engine reads.
pub struct Captures {
    pub header: SourceBitmap,
    pub content: SourceBitmap,
    /// Rendering-surface width the card offsets are measured against.
    pub surface_width_px: u32,
    pub summary: Option<SourceBitmap>,
}

impl Captures {
    pub fn bitmap(&self, source: BitmapSource) -> Option<&SourceBitmap> {
        match source {
            BitmapSource::Header => Some(&self.header),
            BitmapSource::Content => Some(&self.content),
            BitmapSource::Summary => self.summary.as_ref(),
        }
    }
}

fn capture_one(
    provider: &mut dyn CaptureProvider,
    target: CaptureTarget,
) -> Result<Capture, Error> {
    provider.capture(target).map_err(|e| match e {
        Error::Capture { .. } => e,
        other => Error::Capture {
            target,
            reason: other.to_string(),
        },
    })
}

/// Capture header, content and (optionally) summary, strictly one after another.
pub fn capture_all(
    provider: &mut dyn CaptureProvider,
    include_summary: bool,
) -> Result<Captures, Error> {
    let header = capture_one(provider, CaptureTarget::Header)?;
    let content = capture_one(provider, CaptureTarget::Content)?;
    let summary = if include_summary {
        Some(capture_one(provider, CaptureTarget::Summary)?.bitmap)
    } else {
        None
    };
    log::debug!(
        "Captured header {}x{}, content {}x{} (surface {}px), summary {:?}",
        header.bitmap.width(),
        header.bitmap.height(),
        content.bitmap.width(),
        content.bitmap.height(),
        content.surface_width_px,
        summary.as_ref().map(|s| (s.width(), s.height())),
    );
    Ok(Captures {
        header: header.bitmap,
        content: content.bitmap,
        surface_width_px: content.surface_width_px,
        summary,
    })
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceWidth {
    Pixels(u32),
    /// Capture density multiplier (e.g. 2.0 for a 2x screenshot).
    Density(f32),
}

/// Reads captures that were already rasterized to PNG files.
pub struct PngCaptureProvider {
    pub header: PathBuf,
    pub content: PathBuf,
    pub summary: Option<PathBuf>,
    pub surface_width: SurfaceWidth,
}

impl PngCaptureProvider {
    fn load(path: &Path) -> Result<SourceBitmap, Error> {
        let img = image::open(path).map_err(|e| match e {
            image::ImageError::IoError(io) => Error::Io(std::io::Error::new(
                io.kind(),
                format!("{}: {}", io, path.display()),
            )),
            other => Error::Image(other),
        })?;
        Ok(SourceBitmap::new(img.to_rgba8()))
    }
}

impl CaptureProvider for PngCaptureProvider {
    fn capture(&mut self, target: CaptureTarget) -> Result<Capture, Error> {
        let path = match target {
            CaptureTarget::Header => &self.header,
            CaptureTarget::Content => &self.content,
            CaptureTarget::Summary => self.summary.as_ref().ok_or_else(|| Error::Capture {
                target,
                reason: "no summary image configured".into(),
            })?,
        };
        let bitmap = Self::load(path)?;
        let surface_width_px = match (target, self.surface_width) {
            (CaptureTarget::Content, SurfaceWidth::Pixels(px)) => px,
            (CaptureTarget::Content, SurfaceWidth::Density(density)) => {
                if !density.is_finite() || density <= 0.0 {
                    return Err(Error::Configuration(format!(
                        "capture density {density} is not positive"
                    )));
                }
                (bitmap.width() as f32 / density).round() as u32
            }
            _ => bitmap.width(),
        };
        Ok(Capture {
            bitmap,
            surface_width_px,
        })
    }
}

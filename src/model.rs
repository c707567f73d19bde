use std::fmt;

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A captured raster, immutable once produced by a capture provider.
#[derive(Clone, Debug, PartialEq)]
pub struct SourceBitmap {
    pixels: RgbaImage,
}

impl SourceBitmap {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    /// Opaque bitmap of a single color.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb;
        Self {
            pixels: RgbaImage::from_pixel(width, height, image::Rgba([r, g, b, 255])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn full_rect(&self) -> PixelRect {
        PixelRect::new(0, 0, self.width(), self.height())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// True when the rectangle lies entirely inside a `width` x `height` grid.
    /// Computed in u64 so `x + w` cannot wrap.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x as u64 + self.w as u64 <= width as u64
            && self.y as u64 + self.h as u64 <= height as u64
    }
}

impl fmt::Display for PixelRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{} {}x{}]", self.x, self.y, self.w, self.h)
    }
}

/// One card's position in rendering-surface pixels (before the capture density is applied).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub top_offset_px: u32,
    pub height_px: u32,
}

impl ContentBlock {
    pub fn new(top_offset_px: u32, height_px: u32) -> Self {
        Self {
            top_offset_px,
            height_px,
        }
    }

    pub fn bottom_px(&self) -> u64 {
        self.top_offset_px as u64 + self.height_px as u64
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageUnit {
    Pt,
    #[default]
    Mm,
}

impl PageUnit {
    pub fn points_per_unit(self) -> f32 {
        match self {
            PageUnit::Pt => 1.0,
            PageUnit::Mm => 72.0 / 25.4,
        }
    }
}

/// Physical page size and margin, fixed for a whole document.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    pub unit: PageUnit,
}

impl Default for PageGeometry {
    // A4 portrait
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin: 10.0,
            unit: PageUnit::Mm,
        }
    }
}

impl PageGeometry {
    pub fn validate(&self) -> Result<(), Error> {
        let finite = [self.width, self.height, self.margin]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.margin < 0.0 {
            return Err(Error::Configuration(format!(
                "page geometry {}x{} with margin {} is not valid",
                self.width, self.height, self.margin
            )));
        }
        if self.usable_width() <= 0.0 || self.height - 2.0 * self.margin <= 0.0 {
            return Err(Error::Configuration(format!(
                "margin {} leaves no printable area on a {}x{} page",
                self.margin, self.width, self.height
            )));
        }
        Ok(())
    }

    pub fn usable_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    /// Lowest y (measured from the page top) content may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin
    }

    pub fn width_pt(&self) -> f32 {
        self.width * self.unit.points_per_unit()
    }

    pub fn height_pt(&self) -> f32 {
        self.height * self.unit.points_per_unit()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spacing {
    /// Gap below each header, in page units.
    pub header_gap_units: f32,
    /// Gap below each card, in rendering-surface pixels; scaled like card geometry.
    pub block_gap_px: f32,
}

impl Spacing {
    pub fn validate(&self) -> Result<(), Error> {
        for (name, v) in [
            ("header gap", self.header_gap_units),
            ("card gap", self.block_gap_px),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Configuration(format!("{name} {v} must be >= 0")));
            }
        }
        Ok(())
    }
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            header_gap_units: 0.0,
            block_gap_px: 8.0,
        }
    }
}

/// Running position while laying out pages. `current_y` is measured from the page top.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutCursor {
    pub current_page_index: usize,
    pub current_y: f32,
}

/// Which captured bitmap an instruction draws from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BitmapSource {
    Header,
    Content,
    Summary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    Header,
    /// Index into the block registry.
    Block(usize),
    Summary,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacementInstruction {
    pub kind: PlacementKind,
    pub source: BitmapSource,
    pub source_rect: PixelRect,
    pub page_index: usize,
    pub dest_x: f32,
    pub dest_y: f32,
    pub dest_width: f32,
    pub dest_height: f32,
}

/// Output of the pagination engine, placements in sink order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub placements: Vec<PlacementInstruction>,
    pub page_count: usize,
}

impl Layout {
    pub fn placements_on(&self, page_index: usize) -> impl Iterator<Item = &PlacementInstruction> {
        self.placements
            .iter()
            .filter(move |p| p.page_index == page_index)
    }

    pub fn content_placements(&self) -> impl Iterator<Item = &PlacementInstruction> {
        self.placements
            .iter()
            .filter(|p| matches!(p.kind, PlacementKind::Block(_)))
    }
}

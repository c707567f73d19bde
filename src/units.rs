use crate::error::Error;
use crate::model::{ContentBlock, PageGeometry, PixelRect};

/// Maps pixel distances of one captured bitmap onto page units.
///
/// `scale` fits the bitmap's width to the usable page width. `density_ratio`
/// converts rendering-surface pixels (where card offsets are measured) into
/// bitmap pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitConverter {
    scale: f32,
    density_ratio: f32,
}

impl UnitConverter {
    pub fn new(
        usable_width: f32,
        bitmap_width_px: u32,
        surface_width_px: u32,
    ) -> Result<Self, Error> {
        if bitmap_width_px == 0 {
            return Err(Error::Configuration("bitmap width is zero".into()));
        }
        if surface_width_px == 0 {
            return Err(Error::Configuration(
                "rendering surface width is zero".into(),
            ));
        }
        if !usable_width.is_finite() || usable_width <= 0.0 {
            return Err(Error::Configuration(format!(
                "usable page width {usable_width} is not positive"
            )));
        }
        Ok(Self {
            scale: usable_width / bitmap_width_px as f32,
            density_ratio: bitmap_width_px as f32 / surface_width_px as f32,
        })
    }

    /// Converter for a bitmap placed directly at full usable width (header, summary),
    /// where no rendering-surface mapping is involved.
    pub fn fit_width(geometry: &PageGeometry, bitmap_width_px: u32) -> Result<Self, Error> {
        Self::new(geometry.usable_width(), bitmap_width_px, bitmap_width_px)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn density_ratio(&self) -> f32 {
        self.density_ratio
    }

    pub fn px_to_units(&self, bitmap_px: u32) -> f32 {
        bitmap_px as f32 * self.scale
    }

    pub fn surface_to_bitmap_px(&self, surface_px: u32) -> u32 {
        (surface_px as f32 * self.density_ratio).round() as u32
    }

    /// Surface-pixel distance (possibly fractional) straight to page units.
    pub fn surface_to_units(&self, surface_px: f32) -> f32 {
        surface_px * self.density_ratio * self.scale
    }

    /// Full-width bitmap rectangle covering `block`.
    pub fn block_rect(&self, block: &ContentBlock, bitmap_width_px: u32) -> PixelRect {
        PixelRect::new(
            0,
            self.surface_to_bitmap_px(block.top_offset_px),
            bitmap_width_px,
            self.surface_to_bitmap_px(block.height_px),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_widths_are_configuration_errors() {
        assert!(matches!(
            UnitConverter::new(190.0, 0, 400),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            UnitConverter::new(190.0, 800, 0),
            Err(Error::Configuration(_))
        ));
        assert!(matches!(
            UnitConverter::new(0.0, 800, 400),
            Err(Error::Configuration(_))
        ));
    }

    #[test]
    fn density_two_maps_surface_to_bitmap() {
        let conv = UnitConverter::new(200.0, 800, 400).unwrap();
        assert_eq!(conv.density_ratio(), 2.0);
        assert_eq!(conv.scale(), 0.25);
        assert_eq!(conv.surface_to_bitmap_px(150), 300);
        assert_eq!(conv.px_to_units(300), 75.0);
        assert_eq!(conv.surface_to_units(8.0), 4.0);

        let rect = conv.block_rect(&ContentBlock::new(10, 50), 800);
        assert_eq!(rect, PixelRect::new(0, 20, 800, 100));
    }

    #[test]
    fn fit_width_uses_usable_width() {
        let geometry = PageGeometry::default();
        let conv = UnitConverter::fit_width(&geometry, 380).unwrap();
        assert_eq!(conv.density_ratio(), 1.0);
        assert_eq!(conv.scale(), 0.5);
    }
}

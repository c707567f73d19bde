use crate::capture::Captures;
use crate::error::Error;
use crate::model::{
    BitmapSource, Layout, LayoutCursor, PageGeometry, PixelRect, PlacementInstruction,
    PlacementKind, SourceBitmap, Spacing,
};
use crate::registry::BlockRegistry;
use crate::sink::PageSink;
use crate::slicer;
use crate::units::UnitConverter;

/// Slack for float noise when a card fills the remaining space exactly.
const FIT_EPSILON: f32 = 1e-3;

struct Paginator<'a> {
    geometry: &'a PageGeometry,
    header_rect: PixelRect,
    header_height: f32,
    header_gap: f32,
    cursor: LayoutCursor,
    /// Whether anything besides the header sits on the current page.
    page_has_content: bool,
    placements: Vec<PlacementInstruction>,
}

impl Paginator<'_> {
    fn place_header(&mut self) {
        let margin = self.geometry.margin;
        self.placements.push(PlacementInstruction {
            kind: PlacementKind::Header,
            source: BitmapSource::Header,
            source_rect: self.header_rect,
            page_index: self.cursor.current_page_index,
            dest_x: margin,
            dest_y: margin,
            dest_width: self.geometry.usable_width(),
            dest_height: self.header_height,
        });
        self.cursor.current_y = margin + self.header_height + self.header_gap;
        self.page_has_content = false;
    }

    fn remaining(&self) -> f32 {
        self.geometry.bottom_limit() - self.cursor.current_y
    }

    /// Start a new page when `height` does not fit below the cursor. A page
    /// holding only its header is kept: a taller item goes there in full.
    fn ensure_room(&mut self, height: f32, what: PlacementKind) {
        let remaining = self.remaining();
        if height <= remaining + FIT_EPSILON {
            return;
        }
        if self.page_has_content {
            self.cursor.current_page_index += 1;
            log::debug!(
                "{what:?} ({height:.2}) exceeds remaining {remaining:.2}, starting page {}",
                self.cursor.current_page_index
            );
            self.place_header();
        }
        if height > self.remaining() + FIT_EPSILON {
            log::warn!(
                "{what:?} is {height:.2} units tall but a page only holds {:.2}; it will run past the bottom margin",
                self.remaining()
            );
        }
    }

    fn place(&mut self, kind: PlacementKind, source: BitmapSource, rect: PixelRect, height: f32) {
        self.placements.push(PlacementInstruction {
            kind,
            source,
            source_rect: rect,
            page_index: self.cursor.current_page_index,
            dest_x: self.geometry.margin,
            dest_y: self.cursor.current_y,
            dest_width: self.geometry.usable_width(),
            dest_height: height,
        });
        self.page_has_content = true;
    }
}

/// Header and summary are placed whole, so an empty one would be drawn with no height.
fn require_rows(bitmap: &SourceBitmap, what: &str) -> Result<(), Error> {
    if bitmap.height() == 0 {
        return Err(Error::Configuration(format!("{what} capture has no rows")));
    }
    Ok(())
}

/// Lay out header, cards and optional summary into pages.
///
/// Pure and deterministic: identical inputs give identical layouts. Every
/// slice rectangle is checked against its bitmap before the layout is
/// returned, so a sink is never driven with an invalid plan.
pub fn plan(
    captures: &Captures,
    registry: &BlockRegistry,
    geometry: &PageGeometry,
    spacing: &Spacing,
) -> Result<Layout, Error> {
    geometry.validate()?;
    spacing.validate()?;

    let header = &captures.header;
    let content = &captures.content;
    require_rows(header, "header")?;
    if let Some(summary) = &captures.summary {
        require_rows(summary, "summary")?;
    }
    let header_conv = UnitConverter::fit_width(geometry, header.width())?;
    let content_conv =
        UnitConverter::new(geometry.usable_width(), content.width(), captures.surface_width_px)?;

    let header_height = header_conv.px_to_units(header.height());
    let block_gap = content_conv.surface_to_units(spacing.block_gap_px);

    let mut p = Paginator {
        geometry,
        header_rect: header.full_rect(),
        header_height,
        header_gap: spacing.header_gap_units,
        cursor: LayoutCursor {
            current_page_index: 0,
            current_y: geometry.margin,
        },
        page_has_content: false,
        placements: Vec::with_capacity(registry.len() + 2),
    };

    p.place_header();
    if p.remaining() <= 0.0 {
        log::warn!(
            "Header ({header_height:.2} units) leaves no room for content on a {}-unit page",
            geometry.height
        );
    }

    for (i, block) in registry.blocks().iter().enumerate() {
        let rect = content_conv.block_rect(block, content.width());
        if rect.h == 0 {
            return Err(Error::Configuration(format!(
                "card {i} maps to zero bitmap rows at density {}",
                content_conv.density_ratio()
            )));
        }
        if !rect.fits_within(content.width(), content.height()) {
            return Err(Error::Geometry {
                rect,
                width: content.width(),
                height: content.height(),
            });
        }

        let height = content_conv.px_to_units(rect.h);
        let kind = PlacementKind::Block(i);
        p.ensure_room(height, kind);
        p.place(kind, BitmapSource::Content, rect, height);
        p.cursor.current_y += height + block_gap;
    }

    if let Some(summary) = &captures.summary {
        let conv = UnitConverter::fit_width(geometry, summary.width())?;
        let height = conv.px_to_units(summary.height());
        p.ensure_room(height, PlacementKind::Summary);
        p.place(
            PlacementKind::Summary,
            BitmapSource::Summary,
            summary.full_rect(),
            height,
        );
        p.cursor.current_y += height;
    }

    let page_count = p.cursor.current_page_index + 1;
    log::debug!(
        "Planned {} placements for {} cards over {} page(s), scale={:.4} density={}",
        p.placements.len(),
        registry.len(),
        page_count,
        content_conv.scale(),
        content_conv.density_ratio(),
    );

    Ok(Layout {
        placements: p.placements,
        page_count,
    })
}

/// Slice every placement out of its capture and hand it to `sink`, in order.
pub fn render_layout(
    layout: &Layout,
    captures: &Captures,
    background: [u8; 3],
    sink: &mut dyn PageSink,
) -> Result<(), Error> {
    let mut page = 0usize;
    for placement in &layout.placements {
        if placement.page_index < page {
            return Err(Error::Configuration(format!(
                "placement for page {} arrived after page {page}",
                placement.page_index
            )));
        }
        while page < placement.page_index {
            sink.new_page()?;
            page += 1;
        }
        let bitmap = captures.bitmap(placement.source).ok_or_else(|| {
            Error::Configuration(format!("no {:?} capture to draw from", placement.source))
        })?;
        let piece = slicer::slice(bitmap, placement.source_rect, background)?;
        sink.place(
            &piece,
            placement.dest_x,
            placement.dest_y,
            placement.dest_width,
            placement.dest_height,
        )?;
    }
    while page + 1 < layout.page_count {
        sink.new_page()?;
        page += 1;
    }
    Ok(())
}

/// `plan` followed by `render_layout`.
pub fn paginate(
    captures: &Captures,
    registry: &BlockRegistry,
    geometry: &PageGeometry,
    spacing: &Spacing,
    background: [u8; 3],
    sink: &mut dyn PageSink,
) -> Result<Layout, Error> {
    let layout = plan(captures, registry, geometry, spacing)?;
    render_layout(&layout, captures, background, sink)?;
    Ok(layout)
}

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use cardstack_pdf::{
    BlockRegistry, Capture, CaptureProvider, CaptureTarget, Captures, Error, PageGeometry,
    PageSink, PageUnit, SourceBitmap, Spacing,
};
use image::{Rgba, RgbaImage};

/// Content bitmaps are 400px wide over a 200px surface (density 2), so with
/// `geometry()` one surface pixel is exactly one page unit.
pub const BITMAP_WIDTH: u32 = 400;
pub const SURFACE_WIDTH: u32 = 200;
pub const HEADER_ROWS: u32 = 40; // 20 units

/// 220 x 300 pt page, 10 pt margin: usable width 200, content area below the
/// header runs from y=30 to y=290.
pub fn geometry() -> PageGeometry {
    PageGeometry {
        width: 220.0,
        height: 300.0,
        margin: 10.0,
        unit: PageUnit::Pt,
    }
}

pub fn no_gaps() -> Spacing {
    Spacing {
        header_gap_units: 0.0,
        block_gap_px: 0.0,
    }
}

pub fn block_color(i: usize) -> [u8; 3] {
    [(i * 37 % 256) as u8, (i * 91 % 256) as u8, 200]
}

/// Content bitmap with each card painted in `block_color(i)`, gaps in grey.
pub fn content_bitmap(registry: &BlockRegistry, density: u32) -> SourceBitmap {
    let rows = (registry.extent_px() as u32).max(1) * density;
    let mut img = RgbaImage::from_pixel(BITMAP_WIDTH, rows, Rgba([128, 128, 128, 255]));
    for (i, b) in registry.blocks().iter().enumerate() {
        let [r, g, bl] = block_color(i);
        let top = b.top_offset_px * density;
        for y in top..top + b.height_px * density {
            for x in 0..BITMAP_WIDTH {
                img.put_pixel(x, y, Rgba([r, g, bl, 255]));
            }
        }
    }
    SourceBitmap::new(img)
}

pub fn header() -> SourceBitmap {
    SourceBitmap::solid(BITMAP_WIDTH, HEADER_ROWS, [10, 20, 30])
}

pub fn summary(rows: u32) -> SourceBitmap {
    SourceBitmap::solid(BITMAP_WIDTH, rows, [0, 160, 0])
}

pub fn captures(registry: &BlockRegistry, summary_rows: Option<u32>) -> Captures {
    Captures {
        header: header(),
        content: content_bitmap(registry, BITMAP_WIDTH / SURFACE_WIDTH),
        surface_width_px: SURFACE_WIDTH,
        summary: summary_rows.map(summary),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SinkEvent {
    NewPage,
    Place {
        width_px: u32,
        height_px: u32,
        top_left: [u8; 4],
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    },
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
}

impl RecordingSink {
    pub fn placements(&self) -> impl Iterator<Item = &SinkEvent> {
        self.events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Place { .. }))
    }
}

impl PageSink for RecordingSink {
    fn new_page(&mut self) -> Result<(), Error> {
        self.events.push(SinkEvent::NewPage);
        Ok(())
    }

    fn place(
        &mut self,
        bitmap: &SourceBitmap,
        dest_x: f32,
        dest_y: f32,
        dest_width: f32,
        dest_height: f32,
    ) -> Result<(), Error> {
        self.events.push(SinkEvent::Place {
            width_px: bitmap.width(),
            height_px: bitmap.height(),
            top_left: bitmap.pixels().get_pixel(0, 0).0,
            x: dest_x,
            y: dest_y,
            w: dest_width,
            h: dest_height,
        });
        Ok(())
    }
}

/// Serves prepared bitmaps and records the order targets were requested in.
pub struct FakeProvider {
    pub captures: Option<Captures>,
    pub fail_on: Option<CaptureTarget>,
    pub requested: Vec<CaptureTarget>,
}

impl FakeProvider {
    pub fn new(captures: Captures) -> Self {
        Self {
            captures: Some(captures),
            fail_on: None,
            requested: Vec::new(),
        }
    }
}

impl CaptureProvider for FakeProvider {
    fn capture(&mut self, target: CaptureTarget) -> Result<Capture, Error> {
        self.requested.push(target);
        if self.fail_on == Some(target) {
            return Err(Error::Configuration("render target detached".into()));
        }
        let c = self.captures.as_ref().expect("captures");
        let (bitmap, surface_width_px) = match target {
            CaptureTarget::Header => (c.header.clone(), c.header.width()),
            CaptureTarget::Content => (c.content.clone(), c.surface_width_px),
            CaptureTarget::Summary => {
                let s = c.summary.clone().expect("summary capture");
                let w = s.width();
                (s, w)
            }
        };
        Ok(Capture {
            bitmap,
            surface_width_px,
        })
    }
}

/// Fresh scratch directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("cardstack-{name}-{}-{nanos}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

mod capture;
mod config;
mod error;
mod model;
mod naming;
mod paginate;
mod pdf;
mod registry;
mod sink;
mod slicer;
mod units;

pub use capture::{
    Capture, CaptureProvider, CaptureTarget, Captures, PngCaptureProvider, SurfaceWidth,
    capture_all,
};
pub use config::ExportConfig;
pub use error::Error;
pub use model::{
    BitmapSource, ContentBlock, Layout, LayoutCursor, PageGeometry, PageUnit, PixelRect,
    PlacementInstruction, PlacementKind, SourceBitmap, Spacing,
};
pub use naming::{output_file_name, output_file_name_today};
pub use paginate::{paginate, plan, render_layout};
pub use pdf::PdfSink;
pub use registry::BlockRegistry;
pub use sink::PageSink;
pub use slicer::slice;
pub use units::UnitConverter;

use std::path::{Path, PathBuf};
use std::time::Instant;

/// Names the report file.
pub struct ExportRequest<'a> {
    pub subject: &'a str,
    pub report_kind: &'a str,
    pub include_summary: bool,
}

/// Capture, paginate and render into PDF bytes. Nothing is returned on failure.
pub fn export_report_bytes(
    provider: &mut dyn CaptureProvider,
    registry: &BlockRegistry,
    config: &ExportConfig,
    include_summary: bool,
) -> Result<(Vec<u8>, Layout), Error> {
    let t0 = Instant::now();

    config.validate()?;
    let captures = capture_all(provider, include_summary)?;
    let t_capture = t0.elapsed();

    let layout = plan(&captures, registry, &config.geometry, &config.spacing)?;
    let t_plan = t0.elapsed();

    let mut sink = PdfSink::new(config.geometry);
    render_layout(&layout, &captures, config.background, &mut sink)?;
    let bytes = sink.finish();
    let t_render = t0.elapsed();

    log::info!(
        "Timing: capture={:.1}ms, plan={:.1}ms, render={:.1}ms ({} cards, {} pages, {} bytes)",
        t_capture.as_secs_f64() * 1000.0,
        (t_plan - t_capture).as_secs_f64() * 1000.0,
        (t_render - t_plan).as_secs_f64() * 1000.0,
        registry.len(),
        layout.page_count,
        bytes.len(),
    );

    Ok((bytes, layout))
}

/// Export into `out_dir` under the dated report name and return the written path.
pub fn export_report(
    provider: &mut dyn CaptureProvider,
    registry: &BlockRegistry,
    config: &ExportConfig,
    request: &ExportRequest,
    out_dir: &Path,
) -> Result<PathBuf, Error> {
    let t0 = Instant::now();

    let (bytes, _) = export_report_bytes(provider, registry, config, request.include_summary)?;
    let output = out_dir.join(output_file_name_today(request.subject, request.report_kind));
    std::fs::write(&output, &bytes).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("{}: {}", e, output.display()),
        ))
    })?;

    log::info!(
        "Wrote {} in {:.1}ms",
        output.display(),
        t0.elapsed().as_secs_f64() * 1000.0
    );
    Ok(output)
}

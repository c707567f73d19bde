use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use cardstack_pdf::{
    BlockRegistry, Error, ExportConfig, ExportRequest, PngCaptureProvider, SurfaceWidth,
    capture_all, export_report, plan,
};

/// Paginate captured card lists into a PDF report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Header capture (PNG), repeated at the top of every page
    #[arg(long)]
    header: PathBuf,

    /// Capture of the stacked cards (PNG)
    #[arg(long)]
    content: PathBuf,

    /// Optional summary capture (PNG), placed after the last card
    #[arg(long)]
    summary: Option<PathBuf>,

    /// JSON array of {"top_offset_px", "height_px"} card positions
    #[arg(long)]
    blocks: PathBuf,

    /// Width of the rendering surface the card positions were measured on
    #[arg(long, conflicts_with = "density")]
    surface_width: Option<u32>,

    /// Capture density multiplier, used when --surface-width is not given
    #[arg(long, default_value_t = 2.0)]
    density: f32,

    /// JSON export configuration (page geometry, spacing, background)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "report")]
    subject: String,

    #[arg(long, default_value = "cards")]
    kind: String,

    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Print the page layout as JSON instead of writing a PDF
    #[arg(long)]
    plan: bool,
}

fn run(cli: Cli) -> Result<(), Error> {
    let config = match &cli.config {
        Some(path) => ExportConfig::from_json_file(path)?,
        None => ExportConfig::default(),
    };
    let registry = BlockRegistry::from_json_file(&cli.blocks)?;
    let include_summary = cli.summary.is_some();
    let mut provider = PngCaptureProvider {
        header: cli.header,
        content: cli.content,
        summary: cli.summary,
        surface_width: match cli.surface_width {
            Some(px) => SurfaceWidth::Pixels(px),
            None => SurfaceWidth::Density(cli.density),
        },
    };

    if cli.plan {
        let captures = capture_all(&mut provider, include_summary)?;
        let layout = plan(&captures, &registry, &config.geometry, &config.spacing)?;
        println!("{}", serde_json::to_string_pretty(&layout)?);
        return Ok(());
    }

    let request = ExportRequest {
        subject: &cli.subject,
        report_kind: &cli.kind,
        include_summary,
    };
    let output = export_report(&mut provider, &registry, &config, &request, &cli.out_dir)?;
    println!("{}", output.display());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Export failed: {e}");
            ExitCode::FAILURE
        }
    }
}

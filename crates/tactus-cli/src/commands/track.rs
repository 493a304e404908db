use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tactus_core::calib::Calibration;
use tactus_core::config::TouchConfig;
use tactus_core::pipeline::TouchPipeline;
use tactus_core::source::{Acquisition, FrameSource, ReplaySource};

#[derive(Args)]
pub struct TrackArgs {
    /// Input touch-sample recording (.tsr)
    pub file: PathBuf,

    /// Calibration record (JSON); identity fallback if missing
    #[arg(long, default_value = "calibration.json")]
    pub calibration: PathBuf,

    /// Pipeline configuration (TOML); defaults if omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Process at most N frames after warm-up
    #[arg(long)]
    pub limit: Option<usize>,
}

pub fn run(args: &TrackArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            toml::from_str::<TouchConfig>(&text)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => TouchConfig::default(),
    };

    let mut source = ReplaySource::open(&args.file)?;
    let (h, w) = source.dimensions();
    let calibration = Calibration::load_or_default(&args.calibration, (w as u32, h as u32));

    let pb = ProgressBar::new(config.baseline.sample_count as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    pb.set_message("Collecting baseline");

    let mut pipeline = TouchPipeline::warm_up_with_progress(
        &mut source,
        config,
        calibration,
        |collected| pb.set_position(collected as u64),
    )?;
    pb.finish_with_message("Baseline ready");

    let mut processed = 0usize;
    let mut contact_frames = 0usize;
    let mut total_tips = 0usize;

    loop {
        if let Some(limit) = args.limit {
            if processed >= limit {
                break;
            }
        }
        let frame = match source.acquire()? {
            Acquisition::Pair(frame) => frame,
            Acquisition::Dropped => continue,
            Acquisition::Exhausted => break,
        };

        let result = pipeline.process(&frame);
        processed += 1;

        if result.blob.is_some() {
            contact_frames += 1;
        }
        total_tips += result.tips.len();
        for tip in &result.tips {
            println!("frame {:>6}  tip ({:.2}, {:.2})", result.frame_index, tip.x, tip.y);
        }
    }

    print_summary(processed, contact_frames, total_tips, pipeline.calibration().degraded());
    Ok(())
}

fn print_summary(processed: usize, contact_frames: usize, total_tips: usize, degraded: bool) {
    let label = Style::new().dim();
    let value = Style::new().bold().white();
    let warn = Style::new().dim().yellow();

    println!();
    println!(
        "  {:<16}{}",
        label.apply_to("Frames"),
        value.apply_to(processed)
    );
    println!(
        "  {:<16}{}",
        label.apply_to("With contact"),
        value.apply_to(contact_frames)
    );
    println!(
        "  {:<16}{}",
        label.apply_to("Tip points"),
        value.apply_to(total_tips)
    );
    if degraded {
        println!(
            "  {}",
            warn.apply_to("Uncalibrated session: points are raw camera pixels")
        );
    }
}

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tactus_core::source::ReplaySource;

#[derive(Args)]
pub struct InfoArgs {
    /// Input touch-sample recording (.tsr)
    pub file: PathBuf,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let reader = ReplaySource::open(&args.file)?;
    let header = &reader.header;

    println!("File:        {}", args.file.display());
    println!("Version:     {}", header.version);
    println!("Frames:      {}", header.frame_count);
    println!("Dimensions:  {}x{}", header.width, header.height);

    let frame_bytes = header.frame_byte_size();
    let total_mb = (frame_bytes * reader.frame_count()) as f64 / (1024.0 * 1024.0);
    println!("Data size:   {:.1} MB", total_mb);

    Ok(())
}

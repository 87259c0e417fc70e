use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    about = "Drives the movie overlay through a scripted interaction session",
    version
)]
pub struct Args {
    /// JSON session script (displayables plus ordered steps)
    #[arg(long)]
    pub script: PathBuf,

    /// Optional JSON movie settings file
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Path to write the recorded audio/render events and step results as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Path to write the cached movie surface as PNG once the script finishes
    #[arg(long)]
    pub dump_surface: Option<PathBuf>,

    /// Print every step result instead of the marker lines only
    #[arg(long)]
    pub verbose: bool,
}

pub fn parse() -> Result<Args> {
    let args = Args::parse();
    args.validate()?;
    Ok(args)
}

impl Args {
    fn validate(&self) -> Result<()> {
        if !self.script.is_file() {
            bail!("session script {} does not exist", self.script.display());
        }
        if let Some(path) = self.settings.as_ref() {
            if !path.is_file() {
                bail!("settings file {} does not exist", path.display());
            }
        }
        if let Some(path) = self.dump_surface.as_ref() {
            let is_png = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false);
            if !is_png {
                bail!("--dump-surface expects a .png path (got {})", path.display());
            }
        }
        Ok(())
    }
}

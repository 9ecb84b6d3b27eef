//! `gdfetch config` – show where the config lives and what it says.

use anyhow::Result;
use gdfetch_core::{config, logging};

pub fn run_config() -> Result<()> {
    let path = config::config_path()?;
    let cfg = config::load_or_init()?;
    println!("# config: {}", path.display());
    if let Ok(log) = logging::log_file_path() {
        println!("# log:    {}", log.display());
    }
    print!("{}", cfg.to_toml()?);
    Ok(())
}

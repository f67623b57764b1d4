use crate::ui;
use anyhow::{Context, Result};
use erpsetup_provision::preflight;
use erpsetup_provision::shell::LocalShell;

/// Run the preflight checks only.
pub async fn run() -> Result<()> {
    let shell = LocalShell::new();
    let os = preflight::check(&shell).await.context("Preflight failed")?;
    ui::print_os(&os);
    Ok(())
}

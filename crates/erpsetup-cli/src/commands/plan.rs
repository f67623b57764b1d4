use crate::ui;
use anyhow::{Context, Result};
use erpsetup_core::{ConfigOverrides, SetupConfig};
use erpsetup_provision::preflight;
use erpsetup_provision::shell::LocalShell;

/// Evaluate every step's precondition against this host. Passwords are not
/// needed since nothing is applied.
pub async fn run(overrides: ConfigOverrides) -> Result<()> {
    let shell = LocalShell::new();
    preflight::check(&shell).await.context("Preflight failed")?;

    let cfg = SetupConfig::without_secrets(overrides);
    let planned = erpsetup_provision::plan(&cfg, &shell).await?;
    ui::print_plan(&planned);
    Ok(())
}

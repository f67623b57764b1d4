use crate::ui;
use anyhow::Result;
use chrono::Utc;
use erpsetup_core::record::RunRecord;
use erpsetup_core::{AppError, ConfigOverrides, SecretPrompter};
use erpsetup_provision::shell::LocalShell;

/// Parameters for an install run.
pub struct InstallParams {
    pub overrides: ConfigOverrides,
    /// If true, a missing password is an error rather than a prompt.
    pub non_interactive: bool,
}

/// Preflight, resolve settings, run every step, then record the run.
pub async fn run(params: InstallParams) -> Result<RunRecord> {
    let shell = LocalShell::new();
    let mut terminal = ui::TerminalPrompter;
    let prompter: Option<&mut dyn SecretPrompter> = if params.non_interactive {
        None
    } else {
        Some(&mut terminal)
    };

    let started_at = Utc::now();
    let installed = match erpsetup_provision::install(params.overrides, prompter, &shell).await {
        Ok(installed) => installed,
        Err(e @ AppError::StepFailed { .. }) => {
            return Err(anyhow::Error::new(e).context(
                "Install aborted; fix the cause and re-run, completed steps will be skipped",
            ))
        }
        Err(e) => return Err(e.into()),
    };
    let cfg = &installed.cfg;

    let record = RunRecord {
        id: RunRecord::new_id(),
        site_name: cfg.site_name.clone(),
        bench_dir: cfg.bench_dir().display().to_string(),
        service_user: cfg.service_user.clone(),
        applied_steps: installed.summary.applied.iter().map(|s| s.to_string()).collect(),
        skipped_steps: installed.summary.skipped.iter().map(|s| s.to_string()).collect(),
        started_at,
        finished_at: Utc::now(),
    };
    match record.save() {
        Ok(path) => tracing::info!(path = %path.display(), "run record saved"),
        Err(e) => tracing::warn!("could not save run record: {e}"),
    }

    ui::print_summary(&record);
    Ok(record)
}

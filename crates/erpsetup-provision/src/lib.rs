pub mod preflight;
pub mod shell;
pub mod step;
pub mod steps;
pub mod tools;

#[cfg(test)]
mod testing;

use erpsetup_core::{AppError, ConfigOverrides, SecretPrompter, SetupConfig};
use preflight::OsRelease;
use shell::HostShell;
use step::{PlannedStep, RunSummary, StepContext};

/// Outcome of a completed [`install`].
#[derive(Debug)]
pub struct Installed {
    pub os: OsRelease,
    pub cfg: SetupConfig,
    pub summary: RunSummary,
}

/// Full install: preflight, then settings (prompting through `prompter` when
/// given), then every step. Nothing is prompted for or executed until the
/// host passes preflight.
pub async fn install(
    overrides: ConfigOverrides,
    prompter: Option<&mut dyn SecretPrompter>,
    shell: &dyn HostShell,
) -> Result<Installed, AppError> {
    let os = preflight::check(shell).await?;
    tracing::info!(
        os = os.pretty_name.as_deref().unwrap_or(&os.id),
        "preflight passed"
    );

    let cfg = SetupConfig::resolve(overrides, prompter)?;
    tracing::info!(
        site = %cfg.site_name,
        bench = %cfg.bench_dir().display(),
        user = %cfg.service_user,
        branch = %cfg.branch,
        "configuration resolved"
    );

    let summary = run(&cfg, shell).await?;
    Ok(Installed { os, cfg, summary })
}

/// Run the full pipeline against `shell`. Preflight is the caller's job.
pub async fn run(cfg: &SetupConfig, shell: &dyn HostShell) -> Result<RunSummary, AppError> {
    let ctx = StepContext { cfg, shell };
    step::run_steps(&steps::pipeline(), &ctx).await
}

/// Report which steps would run, without changing anything.
pub async fn plan(cfg: &SetupConfig, shell: &dyn HostShell) -> Result<Vec<PlannedStep>, AppError> {
    let ctx = StepContext { cfg, shell };
    step::plan(&steps::pipeline(), &ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use erpsetup_core::config::OS_RELEASE_PATH;
    use crate::testing::FakeShell;

    const NOBLE: &str = "ID=ubuntu\nVERSION_ID=\"24.04\"\n";

    #[derive(Default)]
    struct Counting {
        calls: usize,
    }

    impl SecretPrompter for Counting {
        fn prompt_secret(&mut self, _label: &str) -> Result<String, AppError> {
            self.calls += 1;
            Ok(format!("typed-{}", self.calls))
        }
    }

    #[tokio::test]
    async fn unsupported_distribution_stops_before_prompts_and_commands() {
        let shell = FakeShell::root().with_file(OS_RELEASE_PATH, "ID=debian\nVERSION_ID=\"12\"\n");
        let mut prompter = Counting::default();

        let err = install(ConfigOverrides::default(), Some(&mut prompter), &shell)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Preflight(_)));
        assert_eq!(prompter.calls, 0);
        assert!(shell.execs().is_empty());
    }

    #[tokio::test]
    async fn non_root_stops_before_prompts_and_commands() {
        let shell = FakeShell::root()
            .with_euid(1000)
            .with_file(OS_RELEASE_PATH, NOBLE);
        let mut prompter = Counting::default();

        let err = install(ConfigOverrides::default(), Some(&mut prompter), &shell)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Preflight(ref m) if m.contains("root")));
        assert_eq!(prompter.calls, 0);
        assert!(shell.execs().is_empty());
    }

    #[tokio::test]
    async fn missing_secret_without_prompter_stops_before_commands() {
        let shell = FakeShell::root().with_file(OS_RELEASE_PATH, NOBLE);

        let err = install(ConfigOverrides::default(), None, &shell)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::MissingParam(ref v) if v == "FRAPPE_PASSWORD"));
        assert!(shell.execs().is_empty());
    }

    #[tokio::test]
    async fn secrets_are_resolved_before_the_first_step() {
        let shell = FakeShell::root()
            .with_file(OS_RELEASE_PATH, NOBLE)
            .respond("apt-get update", 1, "");
        let mut prompter = Counting::default();

        let err = install(ConfigOverrides::default(), Some(&mut prompter), &shell)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::StepFailed { index: 1, .. }));
        assert_eq!(prompter.calls, 3);
        assert!(!shell.ran("apt-get install"));
    }
}

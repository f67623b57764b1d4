use crate::shell::{check, shell_quote, Script};
use crate::step::{Step, StepContext};
use crate::tools::Pipx;
use async_trait::async_trait;
use erpsetup_core::config::BENCH_LINK;
use erpsetup_core::AppError;

/// frappe-bench at the pinned version, linked onto the system PATH.
pub struct BenchCli;

#[async_trait]
impl Step for BenchCli {
    fn name(&self) -> &'static str {
        "bench-cli"
    }

    fn description(&self) -> &'static str {
        "Installing bench CLI"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let spec = format!("frappe-bench=={}", ctx.cfg.bench_version);
        Pipx::new(ctx.shell, &ctx.cfg.service_user)
            .install(&spec, true)
            .await?;

        let binary = ctx.cfg.user_bin_dir().join("bench");
        if !ctx.shell.exists(&binary).await? {
            return Err(AppError::MissingArtifact(binary.display().to_string()));
        }
        check(
            ctx.shell,
            "link bench",
            &Script::new(format!(
                "ln -sf {} {BENCH_LINK}",
                shell_quote(&binary.display().to_string())
            )),
        )
        .await?;
        Ok(())
    }
}

/// honcho, which `bench start` uses to run the dev processes.
pub struct Honcho;

#[async_trait]
impl Step for Honcho {
    fn name(&self) -> &'static str {
        "honcho"
    }

    fn description(&self) -> &'static str {
        "Installing honcho"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        ctx.shell.exists(&ctx.cfg.user_bin_dir().join("honcho")).await
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        Pipx::new(ctx.shell, &ctx.cfg.service_user)
            .install("honcho", false)
            .await
    }
}

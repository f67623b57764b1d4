use crate::step::{Step, StepContext};
use crate::tools::Bench;
use async_trait::async_trait;
use erpsetup_core::AppError;

/// supervisor and nginx config are generated and activated by bench itself.
pub struct SetupProduction;

#[async_trait]
impl Step for SetupProduction {
    fn name(&self) -> &'static str {
        "setup-production"
    }

    fn description(&self) -> &'static str {
        "Configuring production services"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.cfg.bench_dir();
        Bench::new(ctx.shell, &ctx.cfg.service_user, &dir)
            .setup_production()
            .await
    }
}

pub struct RestartServices;

#[async_trait]
impl Step for RestartServices {
    fn name(&self) -> &'static str {
        "restart-services"
    }

    fn description(&self) -> &'static str {
        "Restarting bench services"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.cfg.bench_dir();
        Bench::new(ctx.shell, &ctx.cfg.service_user, &dir)
            .restart()
            .await
    }
}

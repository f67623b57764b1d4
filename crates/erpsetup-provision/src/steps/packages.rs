use crate::step::{Step, StepContext};
use crate::tools::{Apt, Systemctl};
use async_trait::async_trait;
use erpsetup_core::config::SYSTEM_PACKAGES;
use erpsetup_core::AppError;

pub struct SystemPackages;

#[async_trait]
impl Step for SystemPackages {
    fn name(&self) -> &'static str {
        "system-packages"
    }

    fn description(&self) -> &'static str {
        "Installing system packages"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let apt = Apt::new(ctx.shell);
        apt.update().await?;
        apt.install(SYSTEM_PACKAGES).await
    }
}

pub struct Redis;

#[async_trait]
impl Step for Redis {
    fn name(&self) -> &'static str {
        "redis"
    }

    fn description(&self) -> &'static str {
        "Enabling redis-server"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        Systemctl::new(ctx.shell).enable_now("redis-server").await
    }
}

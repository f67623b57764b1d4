use crate::step::{Step, StepContext};
use async_trait::async_trait;
use erpsetup_core::config::HOSTS_FILE;
use erpsetup_core::AppError;
use std::path::Path;

/// Resolve the site name to loopback so it can be opened on the host itself.
pub struct HostsAlias;

#[async_trait]
impl Step for HostsAlias {
    fn name(&self) -> &'static str {
        "hosts-alias"
    }

    fn description(&self) -> &'static str {
        "Adding site to /etc/hosts"
    }

    /// Substring match: any line mentioning the site counts.
    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        let hosts = ctx.shell.read_file(Path::new(HOSTS_FILE)).await?;
        Ok(hosts.is_some_and(|text| text.contains(&ctx.cfg.site_name)))
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let path = Path::new(HOSTS_FILE);
        let existing = ctx.shell.read_file(path).await?.unwrap_or_default();
        let sep = if existing.is_empty() || existing.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        ctx.shell
            .append_file(path, &format!("{sep}127.0.0.1\t{}\n", ctx.cfg.site_name))
            .await
    }
}

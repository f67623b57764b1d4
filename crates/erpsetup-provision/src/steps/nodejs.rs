use crate::shell::{check, HostShell, Script};
use crate::step::{Step, StepContext};
use crate::tools::Apt;
use async_trait::async_trait;
use erpsetup_core::config::NODE_MAJOR;
use erpsetup_core::AppError;
use std::path::Path;

const SETUP_SCRIPT: &str = "/tmp/nodesource_setup.sh";

/// Node.js from the NodeSource repository, pinned to one major version.
pub struct NodeRuntime;

#[async_trait]
impl Step for NodeRuntime {
    fn name(&self) -> &'static str {
        "node-runtime"
    }

    fn description(&self) -> &'static str {
        "Installing Node.js"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        Ok(installed_major(ctx.shell).await? == Some(NODE_MAJOR))
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        ctx.shell
            .download(&ctx.cfg.node_setup_url, Path::new(SETUP_SCRIPT))
            .await?;
        check(
            ctx.shell,
            "nodesource setup",
            &Script::new(format!("bash {SETUP_SCRIPT}")),
        )
        .await?;
        Apt::new(ctx.shell).install(&["nodejs"]).await?;
        ctx.shell
            .exec(&Script::new(format!("rm -f {SETUP_SCRIPT}")))
            .await?;
        Ok(())
    }
}

async fn installed_major(shell: &dyn HostShell) -> Result<Option<u32>, AppError> {
    let out = shell.exec(&Script::new("node --version")).await?;
    if !out.success() {
        return Ok(None);
    }
    Ok(parse_major(&out.stdout))
}

/// `v18.19.1` -> 18
fn parse_major(version: &str) -> Option<u32> {
    version
        .trim()
        .strip_prefix('v')?
        .split('.')
        .next()?
        .parse()
        .ok()
}

/// yarn, installed globally through npm.
pub struct Yarn;

#[async_trait]
impl Step for Yarn {
    fn name(&self) -> &'static str {
        "yarn"
    }

    fn description(&self) -> &'static str {
        "Installing yarn"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        Ok(ctx.shell.exec(&Script::new("yarn --version")).await?.success())
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        check(ctx.shell, "npm install yarn", &Script::new("npm install -g yarn")).await?;
        Ok(())
    }
}

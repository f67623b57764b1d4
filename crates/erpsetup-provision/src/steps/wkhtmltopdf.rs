use crate::shell::Script;
use crate::step::{Step, StepContext};
use crate::tools::Apt;
use async_trait::async_trait;
use erpsetup_core::config::WKHTMLTOPDF_VERSION;
use erpsetup_core::AppError;
use std::path::Path;

const DEB_PATH: &str = "/tmp/wkhtmltox.deb";

/// The patched-qt wkhtmltopdf build. The distro package lacks the patches
/// and is removed first.
pub struct Wkhtmltopdf;

#[async_trait]
impl Step for Wkhtmltopdf {
    fn name(&self) -> &'static str {
        "wkhtmltopdf"
    }

    fn description(&self) -> &'static str {
        "Installing wkhtmltopdf"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        let out = ctx.shell.exec(&Script::new("wkhtmltopdf --version")).await?;
        Ok(out.success() && out.stdout.trim() == WKHTMLTOPDF_VERSION)
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let apt = Apt::new(ctx.shell);
        apt.remove_if_present("wkhtmltopdf").await?;
        ctx.shell
            .download(&ctx.cfg.wkhtmltopdf_url, Path::new(DEB_PATH))
            .await?;
        apt.install_deb(Path::new(DEB_PATH)).await?;
        ctx.shell
            .exec(&Script::new(format!("rm -f {DEB_PATH}")))
            .await?;
        Ok(())
    }
}

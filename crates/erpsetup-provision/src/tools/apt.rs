use crate::shell::{check, shell_quote, HostShell, Script};
use erpsetup_core::AppError;
use std::path::Path;

pub struct Apt<'a> {
    shell: &'a dyn HostShell,
}

impl<'a> Apt<'a> {
    pub fn new(shell: &'a dyn HostShell) -> Self {
        Self { shell }
    }

    pub async fn update(&self) -> Result<(), AppError> {
        check(self.shell, "apt-get update", &Script::new("apt-get update")).await?;
        Ok(())
    }

    pub async fn install(&self, packages: &[&str]) -> Result<(), AppError> {
        let script = Script::new(format!("apt-get install -y {}", packages.join(" ")));
        check(self.shell, "apt-get install", &script).await?;
        Ok(())
    }

    /// Remove a package; a package that is not installed is not an error.
    pub async fn remove_if_present(&self, package: &str) -> Result<(), AppError> {
        let out = self
            .shell
            .exec(&Script::new(format!("apt-get remove -y {package}")))
            .await?;
        if !out.success() {
            tracing::debug!(package, status = out.status, "apt-get remove failed, ignoring");
        }
        Ok(())
    }

    /// `dpkg -i` a local package, repairing missing dependencies with
    /// `apt-get -f install` when dpkg refuses.
    pub async fn install_deb(&self, deb: &Path) -> Result<(), AppError> {
        let deb = shell_quote(&deb.display().to_string());
        let out = self
            .shell
            .exec(&Script::new(format!("dpkg -i {deb}")))
            .await?;
        if out.success() {
            return Ok(());
        }
        tracing::info!("dpkg reported missing dependencies, running apt-get -f install");
        check(
            self.shell,
            "apt-get -f install",
            &Script::new("apt-get -f install -y"),
        )
        .await?;
        Ok(())
    }
}

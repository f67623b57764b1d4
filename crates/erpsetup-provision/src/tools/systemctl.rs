use crate::shell::{check, HostShell, Script};
use erpsetup_core::AppError;

pub struct Systemctl<'a> {
    shell: &'a dyn HostShell,
}

impl<'a> Systemctl<'a> {
    pub fn new(shell: &'a dyn HostShell) -> Self {
        Self { shell }
    }

    pub async fn restart(&self, unit: &str) -> Result<(), AppError> {
        let script = Script::new(format!("systemctl restart {unit}"));
        check(self.shell, &format!("restart {unit}"), &script).await?;
        Ok(())
    }

    pub async fn enable_now(&self, unit: &str) -> Result<(), AppError> {
        let script = Script::new(format!("systemctl enable --now {unit}"));
        check(self.shell, &format!("enable {unit}"), &script).await?;
        Ok(())
    }
}

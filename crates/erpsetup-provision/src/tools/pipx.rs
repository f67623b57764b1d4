use crate::shell::{check, HostShell, Script};
use erpsetup_core::AppError;

/// pipx, run inside a user's own tool environment.
pub struct Pipx<'a> {
    shell: &'a dyn HostShell,
    user: &'a str,
}

impl<'a> Pipx<'a> {
    pub fn new(shell: &'a dyn HostShell, user: &'a str) -> Self {
        Self { shell, user }
    }

    /// `force` reinstalls even when the package is already present, which is
    /// how a pinned version replaces whatever is installed.
    pub async fn install(&self, spec: &str, force: bool) -> Result<(), AppError> {
        let flag = if force { " --force" } else { "" };
        let script = Script::new(format!("pipx install{flag} {spec}")).as_user(self.user);
        check(self.shell, &format!("pipx install {spec}"), &script).await?;
        Ok(())
    }
}

use crate::shell::{check, shell_quote, Script};
use crate::step::{Step, StepContext};
use async_trait::async_trait;
use erpsetup_core::AppError;

pub const PROFILE_PATH_LINE: &str = r#"export PATH="$HOME/.local/bin:$PATH""#;

/// The OS account bench and the sites run under. Created once, without
/// prompting.
pub struct ServiceUser;

#[async_trait]
impl Step for ServiceUser {
    fn name(&self) -> &'static str {
        "service-user"
    }

    fn description(&self) -> &'static str {
        "Creating service account"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        let script = Script::new(format!("id -u {}", ctx.cfg.service_user));
        Ok(ctx.shell.exec(&script).await?.success())
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        check(
            ctx.shell,
            "adduser",
            &Script::new(format!(
                "adduser --disabled-password --gecos '' {}",
                ctx.cfg.service_user
            )),
        )
        .await?;
        Ok(())
    }
}

/// Login password and sudo membership for the service account. Both commands
/// are idempotent, so this runs on every install and repairs an account whose
/// creation run was interrupted.
pub struct ServiceUserAccess;

#[async_trait]
impl Step for ServiceUserAccess {
    fn name(&self) -> &'static str {
        "service-user-access"
    }

    fn description(&self) -> &'static str {
        "Setting service account password and sudo rights"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let user = &ctx.cfg.service_user;
        let credentials = format!("{user}:{}", ctx.cfg.service_password.expose());
        check(
            ctx.shell,
            "chpasswd",
            &Script::sensitive(format!("printf '%s\\n' {} | chpasswd", shell_quote(&credentials))),
        )
        .await?;

        check(
            ctx.shell,
            "usermod",
            &Script::new(format!("usermod -aG sudo {user}")),
        )
        .await?;
        Ok(())
    }
}

/// The directory the bench workspace is created in, owned by the service
/// account.
pub struct InstallDir;

#[async_trait]
impl Step for InstallDir {
    fn name(&self) -> &'static str {
        "install-dir"
    }

    fn description(&self) -> &'static str {
        "Preparing install directory"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        let dir = shell_quote(&ctx.cfg.install_dir.display().to_string());
        let out = ctx
            .shell
            .exec(&Script::new(format!("stat -c %U {dir}")))
            .await?;
        Ok(out.success() && out.stdout.trim() == ctx.cfg.service_user)
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let user = &ctx.cfg.service_user;
        let dir = shell_quote(&ctx.cfg.install_dir.display().to_string());
        check(
            ctx.shell,
            "install dir",
            &Script::new(format!("mkdir -p {dir} && chown {user}:{user} {dir}")),
        )
        .await?;
        Ok(())
    }
}

/// Puts pipx's bin directory on the service account's PATH.
pub struct ShellProfile;

#[async_trait]
impl Step for ShellProfile {
    fn name(&self) -> &'static str {
        "shell-profile"
    }

    fn description(&self) -> &'static str {
        "Extending service account PATH"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        let profile = ctx.shell.read_file(&ctx.cfg.shell_profile()).await?;
        Ok(profile.is_some_and(|text| text.lines().any(|l| l.trim() == PROFILE_PATH_LINE)))
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let path = ctx.cfg.shell_profile();
        let existing = ctx.shell.read_file(&path).await?.unwrap_or_default();
        let sep = if existing.is_empty() || existing.ends_with('\n') {
            ""
        } else {
            "\n"
        };
        ctx.shell
            .append_file(&path, &format!("{sep}{PROFILE_PATH_LINE}\n"))
            .await?;

        let user = &ctx.cfg.service_user;
        check(
            ctx.shell,
            "chown profile",
            &Script::new(format!(
                "chown {user}:{user} {}",
                shell_quote(&path.display().to_string())
            )),
        )
        .await?;
        Ok(())
    }
}

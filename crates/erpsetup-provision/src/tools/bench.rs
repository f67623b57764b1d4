use crate::shell::{check, shell_quote, HostShell, Script};
use erpsetup_core::{AppError, Secret};
use std::path::Path;

/// The bench site-management CLI.
///
/// Commands run as the service account with `~/.local/bin` on PATH, except
/// `setup production` which has to run as root.
pub struct Bench<'a> {
    shell: &'a dyn HostShell,
    user: &'a str,
    bench_dir: &'a Path,
}

impl<'a> Bench<'a> {
    pub fn new(shell: &'a dyn HostShell, user: &'a str, bench_dir: &'a Path) -> Self {
        Self {
            shell,
            user,
            bench_dir,
        }
    }

    pub async fn init(
        &self,
        parent_dir: &Path,
        name: &str,
        branch: &str,
        python: &str,
    ) -> Result<(), AppError> {
        let cmd = format!(
            "bench init --frappe-branch {} --python {} {}",
            shell_quote(branch),
            python,
            shell_quote(name)
        );
        self.run_in(parent_dir, "bench init", Script::new(cmd)).await
    }

    pub async fn get_app(&self, app: &str, branch: &str) -> Result<(), AppError> {
        let cmd = format!("bench get-app --branch {} {app}", shell_quote(branch));
        self.run("bench get-app", Script::new(cmd)).await
    }

    pub async fn new_site(
        &self,
        site: &str,
        db_root_password: &Secret,
        admin_password: &Secret,
    ) -> Result<(), AppError> {
        let cmd = format!(
            "bench new-site {} --db-root-password {} --admin-password {}",
            shell_quote(site),
            shell_quote(db_root_password.expose()),
            shell_quote(admin_password.expose()),
        );
        self.run("bench new-site", Script::sensitive(cmd)).await
    }

    pub async fn install_app(&self, site: &str, app: &str) -> Result<(), AppError> {
        let cmd = format!("bench --site {} install-app {app}", shell_quote(site));
        self.run("bench install-app", Script::new(cmd)).await
    }

    /// Call a python method on the site through `bench execute`.
    pub async fn execute(&self, site: &str, method: &str, args: &str) -> Result<(), AppError> {
        let cmd = format!(
            "bench --site {} execute {method} --args {}",
            shell_quote(site),
            shell_quote(args)
        );
        self.run("bench execute", Script::new(cmd)).await
    }

    pub async fn use_site(&self, site: &str) -> Result<(), AppError> {
        let cmd = format!("bench use {}", shell_quote(site));
        self.run("bench use", Script::new(cmd)).await
    }

    /// Generate and activate supervisor and nginx config. Runs as root.
    pub async fn setup_production(&self) -> Result<(), AppError> {
        let script = Script::new(format!(
            "cd {} && {} setup production {} --yes",
            shell_quote(&self.bench_dir.display().to_string()),
            erpsetup_core::config::BENCH_LINK,
            self.user
        ));
        check(self.shell, "bench setup production", &script).await?;
        Ok(())
    }

    pub async fn restart(&self) -> Result<(), AppError> {
        self.run("bench restart", Script::new("bench restart")).await
    }

    async fn run(&self, context: &str, cmd: Script) -> Result<(), AppError> {
        self.run_in(self.bench_dir, context, cmd).await
    }

    async fn run_in(&self, dir: &Path, context: &str, cmd: Script) -> Result<(), AppError> {
        let body = format!(
            "export PATH=\"$HOME/.local/bin:$PATH\" && cd {} && {}",
            shell_quote(&dir.display().to_string()),
            cmd.body()
        );
        let script = if cmd.is_sensitive() {
            Script::sensitive(body)
        } else {
            Script::new(body)
        };
        check(self.shell, context, &script.as_user(self.user)).await?;
        Ok(())
    }
}

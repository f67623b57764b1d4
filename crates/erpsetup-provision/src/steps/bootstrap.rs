use crate::step::{Step, StepContext};
use crate::tools::Bench;
use async_trait::async_trait;
use erpsetup_core::config::{ERP_APP, PYTHON_BIN};
use erpsetup_core::AppError;

/// Setting flipped on the new site through `bench execute`.
const SETTING_METHOD: &str = "frappe.client.set_value";
const SETTING_ARGS: &str = "['System Settings', 'System Settings', 'enable_scheduler', 1]";

pub struct InitWorkspace;

#[async_trait]
impl Step for InitWorkspace {
    fn name(&self) -> &'static str {
        "init-workspace"
    }

    fn description(&self) -> &'static str {
        "Initialising bench workspace"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        ctx.shell.exists(&ctx.cfg.bench_dir()).await
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let cfg = ctx.cfg;
        let dir = cfg.bench_dir();
        Bench::new(ctx.shell, &cfg.service_user, &dir)
            .init(&cfg.install_dir, &cfg.bench_name, &cfg.branch, PYTHON_BIN)
            .await
    }
}

pub struct FetchApp;

#[async_trait]
impl Step for FetchApp {
    fn name(&self) -> &'static str {
        "fetch-app"
    }

    fn description(&self) -> &'static str {
        "Fetching ERPNext"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        let app_dir = ctx.cfg.bench_dir().join("apps").join(ERP_APP);
        ctx.shell.exists(&app_dir).await
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.cfg.bench_dir();
        Bench::new(ctx.shell, &ctx.cfg.service_user, &dir)
            .get_app(ERP_APP, &ctx.cfg.branch)
            .await
    }
}

pub struct CreateSite;

#[async_trait]
impl Step for CreateSite {
    fn name(&self) -> &'static str {
        "create-site"
    }

    fn description(&self) -> &'static str {
        "Creating site"
    }

    async fn is_satisfied(&self, ctx: &StepContext<'_>) -> Result<bool, AppError> {
        ctx.shell.exists(&ctx.cfg.site_dir()).await
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let cfg = ctx.cfg;
        let dir = cfg.bench_dir();
        Bench::new(ctx.shell, &cfg.service_user, &dir)
            .new_site(&cfg.site_name, &cfg.db_root_password, &cfg.admin_password)
            .await
    }
}

/// Re-run every time; bench treats an installed app as a no-op.
pub struct InstallApp;

#[async_trait]
impl Step for InstallApp {
    fn name(&self) -> &'static str {
        "install-app"
    }

    fn description(&self) -> &'static str {
        "Installing ERPNext on site"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.cfg.bench_dir();
        Bench::new(ctx.shell, &ctx.cfg.service_user, &dir)
            .install_app(&ctx.cfg.site_name, ERP_APP)
            .await
    }
}

pub struct SiteSetting;

#[async_trait]
impl Step for SiteSetting {
    fn name(&self) -> &'static str {
        "site-setting"
    }

    fn description(&self) -> &'static str {
        "Enabling site scheduler"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.cfg.bench_dir();
        Bench::new(ctx.shell, &ctx.cfg.service_user, &dir)
            .execute(&ctx.cfg.site_name, SETTING_METHOD, SETTING_ARGS)
            .await
    }
}

pub struct DefaultSite;

#[async_trait]
impl Step for DefaultSite {
    fn name(&self) -> &'static str {
        "default-site"
    }

    fn description(&self) -> &'static str {
        "Setting default site"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let dir = ctx.cfg.bench_dir();
        Bench::new(ctx.shell, &ctx.cfg.service_user, &dir)
            .use_site(&ctx.cfg.site_name)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeShell;
    use erpsetup_core::{ConfigOverrides, SetupConfig};

    fn config() -> SetupConfig {
        SetupConfig::resolve(
            ConfigOverrides {
                service_password: Some("svc".into()),
                db_root_password: Some("dbpw".into()),
                admin_password: Some("adminpw".into()),
                site_name: Some("erp.example.com".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn workspace_is_initialised_in_install_dir_on_branch() {
        let shell = FakeShell::root();
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };

        assert!(!InitWorkspace.is_satisfied(&ctx).await.unwrap());
        InitWorkspace.apply(&ctx).await.unwrap();

        let script = shell.execs().pop().unwrap();
        assert!(script.contains("cd '\\''/home/frappe'\\''"));
        assert!(script.contains("bench init --frappe-branch '\\''version-15'\\'' --python python3"));
    }

    #[tokio::test]
    async fn site_is_created_with_both_passwords() {
        let shell = FakeShell::root();
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };
        CreateSite.apply(&ctx).await.unwrap();

        let script = shell.execs().pop().unwrap();
        assert!(script.contains("bench new-site '\\''erp.example.com'\\''"));
        assert!(script.contains("--db-root-password '\\''dbpw'\\''"));
        assert!(script.contains("--admin-password '\\''adminpw'\\''"));
    }

    #[tokio::test]
    async fn existing_app_and_site_are_detected() {
        let shell = FakeShell::root()
            .with_dir("/home/frappe/frappe-bench/apps/erpnext")
            .with_dir("/home/frappe/frappe-bench/sites/erp.example.com");
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };

        assert!(InitWorkspace.is_satisfied(&ctx).await.unwrap());
        assert!(FetchApp.is_satisfied(&ctx).await.unwrap());
        assert!(CreateSite.is_satisfied(&ctx).await.unwrap());
        assert!(!InstallApp.is_satisfied(&ctx).await.unwrap());
    }

    #[tokio::test]
    async fn scheduler_setting_goes_through_bench_execute() {
        let shell = FakeShell::root();
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };
        SiteSetting.apply(&ctx).await.unwrap();

        let script = shell.execs().pop().unwrap();
        assert!(script.contains("execute frappe.client.set_value --args"));
        assert!(script.contains("enable_scheduler"));
    }
}

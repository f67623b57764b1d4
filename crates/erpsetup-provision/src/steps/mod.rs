//! The ordered provisioning pipeline.

mod bench_cli;
mod bootstrap;
mod hosts;
mod mariadb;
mod nodejs;
mod packages;
mod production;
mod user;
mod wkhtmltopdf;

use crate::step::Step;

/// Every step, in the order they must run.
pub fn pipeline() -> Vec<Box<dyn Step>> {
    vec![
        Box::new(packages::SystemPackages),
        Box::new(nodejs::NodeRuntime),
        Box::new(nodejs::Yarn),
        Box::new(wkhtmltopdf::Wkhtmltopdf),
        Box::new(mariadb::MariaDbConfig),
        Box::new(mariadb::MariaDbSecurity),
        Box::new(packages::Redis),
        Box::new(user::ServiceUser),
        Box::new(user::ServiceUserAccess),
        Box::new(user::InstallDir),
        Box::new(user::ShellProfile),
        Box::new(bench_cli::BenchCli),
        Box::new(bench_cli::Honcho),
        Box::new(bootstrap::InitWorkspace),
        Box::new(bootstrap::FetchApp),
        Box::new(bootstrap::CreateSite),
        Box::new(bootstrap::InstallApp),
        Box::new(bootstrap::SiteSetting),
        Box::new(bootstrap::DefaultSite),
        Box::new(production::SetupProduction),
        Box::new(production::RestartServices),
        Box::new(hosts::HostsAlias),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::{run_steps, StepContext};
    use crate::testing::FakeShell;
    use erpsetup_core::config::{BENCH_LINK, HOSTS_FILE};
    use erpsetup_core::{AppError, ConfigOverrides, SetupConfig};

    fn config() -> SetupConfig {
        SetupConfig::resolve(
            ConfigOverrides {
                service_password: Some("svc-pw".into()),
                db_root_password: Some("db-pw".into()),
                admin_password: Some("admin-pw".into()),
                ..Default::default()
            },
            None,
        )
        .unwrap()
    }

    fn fresh_host() -> FakeShell {
        FakeShell::root()
            .with_file(HOSTS_FILE, "127.0.0.1 localhost\n")
            .with_file("/home/frappe/.bashrc", "# ~/.bashrc\n")
            .respond("node --version", 127, "")
            .respond("yarn --version", 127, "")
            .respond("wkhtmltopdf --version", 127, "")
            .respond("id -u frappe", 1, "")
            .respond("stat -c %U", 1, "")
            .creates("pipx install --force", "/home/frappe/.local/bin/bench")
    }

    fn provisioned_host() -> FakeShell {
        FakeShell::root()
            .with_file(HOSTS_FILE, "127.0.0.1 localhost\n127.0.0.1\terp.local\n")
            .with_file(
                "/home/frappe/.bashrc",
                "# ~/.bashrc\nexport PATH=\"$HOME/.local/bin:$PATH\"\n",
            )
            .with_dir("/home/frappe/.local/bin/bench")
            .with_dir("/home/frappe/.local/bin/honcho")
            .with_dir("/home/frappe/frappe-bench/apps/erpnext")
            .with_dir("/home/frappe/frappe-bench/sites/erp.local")
            .respond("node --version", 0, "v18.20.4\n")
            .respond("wkhtmltopdf --version", 0, "wkhtmltopdf 0.12.6.1 (with patched qt)\n")
            .respond("stat -c %U", 0, "frappe\n")
            .respond("SELECT 1", 1, "")
    }

    #[tokio::test]
    async fn fresh_host_end_to_end() {
        let shell = fresh_host();
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };

        let summary = run_steps(&pipeline(), &ctx).await.unwrap();

        assert!(summary.skipped.is_empty());
        assert_eq!(summary.applied.len(), pipeline().len());
        assert!(shell.ran("adduser --disabled-password --gecos '' frappe"));
        assert!(shell.ran("usermod -aG sudo frappe"));
        assert!(shell.ran(&format!("ln -sf '/home/frappe/.local/bin/bench' {BENCH_LINK}")));
        assert!(shell.ran("bench new-site '\\''erp.local'\\''"));
        assert!(shell.ran("setup production frappe --yes"));
        assert!(shell
            .file(HOSTS_FILE)
            .unwrap()
            .contains("127.0.0.1\terp.local"));

        let execs = shell.execs();
        let pos = |needle: &str| execs.iter().position(|s| s.contains(needle)).unwrap();
        assert!(pos("apt-get update") < pos("adduser"));
        assert!(pos("adduser") < pos("bench init"));
        assert!(pos("bench init") < pos("get-app"));
        assert!(pos("get-app") < pos("new-site"));
        assert!(pos("new-site") < pos("install-app"));
        assert!(pos("bench use") < pos("setup production"));
    }

    #[tokio::test]
    async fn rerun_on_provisioned_host_creates_nothing() {
        let shell = provisioned_host();
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };

        let summary = run_steps(&pipeline(), &ctx).await.unwrap();

        for name in [
            "service-user",
            "install-dir",
            "shell-profile",
            "init-workspace",
            "fetch-app",
            "create-site",
            "hosts-alias",
        ] {
            assert!(summary.skipped.contains(&name), "{name} was not skipped");
        }
        for needle in ["adduser", "mkdir -p", "bench init", "get-app", "new-site"] {
            assert!(!shell.ran(needle), "{needle} ran on a provisioned host");
        }
        assert!(shell.ran("install-app erpnext"));
        assert!(shell.ran("usermod -aG sudo frappe"));
        assert!(shell.ran("MYSQL_PWD="));
        assert_eq!(
            shell
                .file(HOSTS_FILE)
                .unwrap()
                .lines()
                .filter(|l| l.contains("erp.local"))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn failure_stops_later_steps() {
        let shell = fresh_host().respond("get-app", 1, "");
        let cfg = config();
        let ctx = StepContext { cfg: &cfg, shell: &shell };

        let err = run_steps(&pipeline(), &ctx).await.unwrap_err();

        assert!(matches!(err, AppError::StepFailed { ref name, .. } if name == "fetch-app"));
        assert!(!shell.ran("new-site"));
        assert!(!shell.ran("setup production"));
    }
}

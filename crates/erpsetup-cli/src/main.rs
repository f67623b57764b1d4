mod commands;
mod ui;

use clap::{Args, Parser, Subcommand};
use commands::install::InstallParams;
use erpsetup_core::ConfigOverrides;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "erpsetup",
    version,
    about = "Provision an Ubuntu 24.04 host to run ERPNext in production"
)]
struct Cli {
    /// Log every command that is run (secrets are redacted). Overrides RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full install: packages → MariaDB/Redis → service account → bench → site → production
    Install {
        #[command(flatten)]
        setup: SetupArgs,

        /// Fail instead of prompting when a password is not provided
        #[arg(long, default_value = "false")]
        non_interactive: bool,
    },

    /// Show which steps would run and which are already done
    Plan {
        #[command(flatten)]
        setup: SetupArgs,
    },

    /// Verify privileges and the host OS without changing anything
    Check,

    /// Show previous successful runs
    ListRuns,
}

#[derive(Args, Debug, Clone)]
struct SetupArgs {
    /// Service account that owns the bench
    #[arg(long, env = "FRAPPE_USER")]
    user: Option<String>,

    /// Login password for the service account
    #[arg(long, env = "FRAPPE_PASSWORD", hide_env_values = true)]
    user_password: Option<String>,

    /// MariaDB root password
    #[arg(long, env = "DB_ROOT_PASSWORD", hide_env_values = true)]
    db_root_password: Option<String>,

    /// Password for the site's Administrator user
    #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: Option<String>,

    /// Site name (also added to /etc/hosts)
    #[arg(long, env = "SITE_NAME")]
    site: Option<String>,

    /// Directory the bench workspace is created in
    #[arg(long, env = "INSTALL_DIR")]
    install_dir: Option<String>,

    /// Name of the bench workspace directory
    #[arg(long, env = "BENCH_NAME")]
    bench_name: Option<String>,

    /// Frappe/ERPNext branch (e.g. version-15)
    #[arg(long, env = "ERPNEXT_BRANCH")]
    branch: Option<String>,

    /// URL of the wkhtmltopdf .deb to install
    #[arg(long, env = "WKHTMLTOPDF_DEB_URL")]
    wkhtmltopdf_url: Option<String>,

    /// URL of the NodeSource setup script
    #[arg(long, env = "NODE_SETUP_URL")]
    node_setup_url: Option<String>,

    /// frappe-bench version to pin
    #[arg(long, env = "BENCH_VERSION")]
    bench_version: Option<String>,
}

impl From<SetupArgs> for ConfigOverrides {
    fn from(args: SetupArgs) -> Self {
        ConfigOverrides {
            service_user: args.user,
            service_password: args.user_password,
            db_root_password: args.db_root_password,
            admin_password: args.admin_password,
            site_name: args.site,
            install_dir: args.install_dir,
            bench_name: args.bench_name,
            branch: args.branch,
            wkhtmltopdf_url: args.wkhtmltopdf_url,
            node_setup_url: args.node_setup_url,
            bench_version: args.bench_version,
        }
    }
}

/// `-v` wins over RUST_LOG; RUST_LOG wins over the `info` default.
fn log_directives(verbose: bool, rust_log: Option<String>) -> String {
    if verbose {
        return "debug".to_string();
    }
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| "info".to_string())
}

fn init_logging(verbose: bool) {
    let directives = log_directives(verbose, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn dispatch(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Install {
            setup,
            non_interactive,
        } => {
            let params = InstallParams {
                overrides: setup.into(),
                non_interactive,
            };
            commands::install::run(params).await?;
        }
        Commands::Plan { setup } => {
            commands::plan::run(setup.into()).await?;
        }
        Commands::Check => {
            commands::check::run().await?;
        }
        Commands::ListRuns => {
            commands::list_runs::run()?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    // A .env file in the working directory behaves like exported variables.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = dispatch(cli.command).await {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbose_flag_overrides_rust_log() {
        assert_eq!(log_directives(true, Some("warn".into())), "debug");
        assert_eq!(log_directives(false, Some("warn".into())), "warn");
        assert_eq!(log_directives(false, Some(" ".into())), "info");
        assert_eq!(log_directives(false, None), "info");
    }

    #[test]
    fn install_flags_map_onto_overrides() {
        let cli = Cli::try_parse_from([
            "erpsetup",
            "install",
            "--site",
            "erp.example.com",
            "--bench-name",
            "prod-bench",
            "--non-interactive",
        ])
        .unwrap();
        let Commands::Install {
            setup,
            non_interactive,
        } = cli.command
        else {
            panic!("expected install");
        };
        assert!(non_interactive);
        let overrides: ConfigOverrides = setup.into();
        assert_eq!(overrides.site_name.as_deref(), Some("erp.example.com"));
        assert_eq!(overrides.bench_name.as_deref(), Some("prod-bench"));
    }
}

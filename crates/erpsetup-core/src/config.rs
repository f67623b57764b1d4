use crate::error::AppError;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_SERVICE_USER: &str = "frappe";
pub const DEFAULT_SITE_NAME: &str = "erp.local";
pub const DEFAULT_INSTALL_DIR: &str = "/home/frappe";
pub const DEFAULT_BENCH_NAME: &str = "frappe-bench";
pub const DEFAULT_BRANCH: &str = "version-15";
pub const DEFAULT_WKHTMLTOPDF_URL: &str = "https://github.com/wkhtmltopdf/packaging/releases/download/0.12.6.1-3/wkhtmltox_0.12.6.1-3.jammy_amd64.deb";
pub const DEFAULT_NODE_SETUP_URL: &str = "https://deb.nodesource.com/setup_18.x";
pub const DEFAULT_BENCH_VERSION: &str = "5.22.9";

pub const NODE_MAJOR: u32 = 18;
pub const WKHTMLTOPDF_VERSION: &str = "wkhtmltopdf 0.12.6.1 (with patched qt)";
pub const SUPPORTED_OS_ID: &str = "ubuntu";
pub const SUPPORTED_OS_MAJOR: u32 = 24;
pub const PYTHON_BIN: &str = "python3";
pub const ERP_APP: &str = "erpnext";

pub const OS_RELEASE_PATH: &str = "/etc/os-release";
pub const HOSTS_FILE: &str = "/etc/hosts";
pub const BENCH_LINK: &str = "/usr/local/bin/bench";
pub const MARIADB_CONF_PATH: &str = "/etc/mysql/mariadb.conf.d/99-erpnext.cnf";

pub const SYSTEM_PACKAGES: &[&str] = &[
    "git",
    "curl",
    "build-essential",
    "pkg-config",
    "software-properties-common",
    "python3-dev",
    "python3-pip",
    "python3-venv",
    "pipx",
    "mariadb-server",
    "mariadb-client",
    "libmysqlclient-dev",
    "redis-server",
    "xvfb",
    "libfontconfig1",
    "fontconfig",
    "supervisor",
    "nginx",
    "cron",
];

/// A secret value. `Debug` and `Display` never print the contents.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Secret(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

/// Source of interactively entered secrets.
pub trait SecretPrompter {
    /// Ask for a secret without echoing it. May return an empty string.
    fn prompt_secret(&mut self, label: &str) -> Result<String, AppError>;
}

/// Raw setting values as they arrive from flags, the environment or `.env`.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub service_user: Option<String>,
    pub service_password: Option<String>,
    pub db_root_password: Option<String>,
    pub admin_password: Option<String>,
    pub site_name: Option<String>,
    pub install_dir: Option<String>,
    pub bench_name: Option<String>,
    pub branch: Option<String>,
    pub wkhtmltopdf_url: Option<String>,
    pub node_setup_url: Option<String>,
    pub bench_version: Option<String>,
}

/// Fully resolved settings for one provisioning run.
#[derive(Debug, Clone)]
pub struct SetupConfig {
    pub service_user: String,
    pub service_password: Secret,
    pub db_root_password: Secret,
    pub admin_password: Secret,
    pub site_name: String,
    pub install_dir: PathBuf,
    pub bench_name: String,
    pub branch: String,
    pub wkhtmltopdf_url: String,
    pub node_setup_url: String,
    pub bench_version: String,
}

impl SetupConfig {
    /// Resolve every setting, prompting for unset secrets.
    ///
    /// With `prompter == None` (non-interactive mode) a missing secret is an
    /// error instead of a prompt.
    pub fn resolve(
        overrides: ConfigOverrides,
        mut prompter: Option<&mut dyn SecretPrompter>,
    ) -> Result<Self, AppError> {
        let service_password = resolve_secret(
            overrides.service_password.clone(),
            "FRAPPE_PASSWORD",
            "Password for the service account",
            prompter.as_deref_mut(),
        )?;
        let db_root_password = resolve_secret(
            overrides.db_root_password.clone(),
            "DB_ROOT_PASSWORD",
            "MariaDB root password",
            prompter.as_deref_mut(),
        )?;
        let admin_password = resolve_secret(
            overrides.admin_password.clone(),
            "ADMIN_PASSWORD",
            "ERPNext Administrator password",
            prompter.as_deref_mut(),
        )?;

        let mut cfg = Self::without_secrets(overrides);
        cfg.service_password = service_password;
        cfg.db_root_password = db_root_password;
        cfg.admin_password = admin_password;
        Ok(cfg)
    }

    /// Resolve the non-secret settings only. Secrets are left empty, which is
    /// enough for read-only inspection of the host.
    pub fn without_secrets(overrides: ConfigOverrides) -> Self {
        Self {
            service_user: or_default(overrides.service_user, DEFAULT_SERVICE_USER),
            service_password: Secret::default(),
            db_root_password: Secret::default(),
            admin_password: Secret::default(),
            site_name: or_default(overrides.site_name, DEFAULT_SITE_NAME),
            install_dir: PathBuf::from(or_default(overrides.install_dir, DEFAULT_INSTALL_DIR)),
            bench_name: or_default(overrides.bench_name, DEFAULT_BENCH_NAME),
            branch: or_default(overrides.branch, DEFAULT_BRANCH),
            wkhtmltopdf_url: or_default(overrides.wkhtmltopdf_url, DEFAULT_WKHTMLTOPDF_URL),
            node_setup_url: or_default(overrides.node_setup_url, DEFAULT_NODE_SETUP_URL),
            bench_version: or_default(overrides.bench_version, DEFAULT_BENCH_VERSION),
        }
    }

    /// /home/<service user>
    pub fn home_dir(&self) -> PathBuf {
        PathBuf::from("/home").join(&self.service_user)
    }

    /// Binaries installed by pipx for the service account.
    pub fn user_bin_dir(&self) -> PathBuf {
        self.home_dir().join(".local/bin")
    }

    pub fn shell_profile(&self) -> PathBuf {
        self.home_dir().join(".bashrc")
    }

    pub fn bench_dir(&self) -> PathBuf {
        self.install_dir.join(&self.bench_name)
    }

    pub fn site_dir(&self) -> PathBuf {
        self.bench_dir().join("sites").join(&self.site_name)
    }
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn resolve_secret<P: SecretPrompter + ?Sized>(
    preset: Option<String>,
    var: &str,
    label: &str,
    prompter: Option<&mut P>,
) -> Result<Secret, AppError> {
    if let Some(value) = preset.filter(|v| !v.is_empty()) {
        return Ok(Secret::new(value));
    }
    let Some(prompter) = prompter else {
        return Err(AppError::MissingParam(var.to_string()));
    };
    loop {
        let value = prompter.prompt_secret(label)?;
        if !value.is_empty() {
            return Ok(Secret::new(value));
        }
        tracing::warn!("{label} cannot be empty");
    }
}

/// Resolve the app data directory: ~/.erpsetup/
pub fn app_dir() -> Result<PathBuf, AppError> {
    let home = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
    Ok(home.join(".erpsetup"))
}

/// ~/.erpsetup/runs/
pub fn runs_dir() -> Result<PathBuf, AppError> {
    Ok(app_dir()?.join("runs"))
}

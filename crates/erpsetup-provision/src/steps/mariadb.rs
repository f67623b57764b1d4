use crate::step::{Step, StepContext};
use crate::tools::{sql_quote, MariaDb, Systemctl};
use async_trait::async_trait;
use erpsetup_core::config::MARIADB_CONF_PATH;
use erpsetup_core::AppError;
use std::path::Path;

/// Server settings Frappe expects: utf8mb4 everywhere, large packets, and
/// no strict SQL mode.
pub const SERVER_CONFIG: &str = r#"[mysqld]
innodb-file-per-table = 1
innodb_default_row_format = dynamic
max_allowed_packet = 256M
character-set-client-handshake = FALSE
character-set-server = utf8mb4
collation-server = utf8mb4_unicode_ci
sql_mode = ""

[mysql]
default-character-set = utf8mb4
"#;

pub struct MariaDbConfig;

#[async_trait]
impl Step for MariaDbConfig {
    fn name(&self) -> &'static str {
        "mariadb-config"
    }

    fn description(&self) -> &'static str {
        "Configuring MariaDB"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        ctx.shell
            .write_file(Path::new(MARIADB_CONF_PATH), SERVER_CONFIG)
            .await?;
        Systemctl::new(ctx.shell).restart("mariadb").await
    }
}

/// Password-protect root and remove the anonymous accounts and test database
/// a fresh install ships with.
pub struct MariaDbSecurity;

#[async_trait]
impl Step for MariaDbSecurity {
    fn name(&self) -> &'static str {
        "mariadb-security"
    }

    fn description(&self) -> &'static str {
        "Securing MariaDB root account"
    }

    async fn apply(&self, ctx: &StepContext<'_>) -> Result<(), AppError> {
        let db = MariaDb::new(ctx.shell);
        let access = db.detect_root_access().await?;
        let sql = security_statements(ctx.cfg.db_root_password.expose());
        db.execute(access, &ctx.cfg.db_root_password, &sql).await
    }
}

pub fn security_statements(root_password: &str) -> String {
    format!(
        r"ALTER USER 'root'@'localhost' IDENTIFIED VIA mysql_native_password;
SET PASSWORD FOR 'root'@'localhost' = PASSWORD({});
DELETE FROM mysql.global_priv WHERE User='';
DROP DATABASE IF EXISTS test;
DELETE FROM mysql.db WHERE Db='test' OR Db='test\\_%';
FLUSH PRIVILEGES;",
        sql_quote(root_password)
    )
}

use crate::shell::{check, shell_quote, HostShell, Script};
use erpsetup_core::{AppError, Secret};

/// How the local root account can be reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootAccess {
    /// unix_socket authentication as the OS root user, no password.
    Socket,
    /// The configured root password.
    Password,
}

pub struct MariaDb<'a> {
    shell: &'a dyn HostShell,
}

impl<'a> MariaDb<'a> {
    pub fn new(shell: &'a dyn HostShell) -> Self {
        Self { shell }
    }

    /// Try passwordless root first; fall back to the configured password.
    pub async fn detect_root_access(&self) -> Result<RootAccess, AppError> {
        let ping = Script::new("mysql -uroot -e 'SELECT 1'");
        let out = self.shell.exec(&ping).await?;
        if out.success() {
            Ok(RootAccess::Socket)
        } else {
            tracing::info!("passwordless root access refused, using the configured root password");
            Ok(RootAccess::Password)
        }
    }

    /// Run a batch of statements as root.
    pub async fn execute(
        &self,
        access: RootAccess,
        password: &Secret,
        sql: &str,
    ) -> Result<(), AppError> {
        let client = match access {
            RootAccess::Socket => "mysql -uroot".to_string(),
            RootAccess::Password => {
                format!("MYSQL_PWD={} mysql -uroot", shell_quote(password.expose()))
            }
        };
        let script = Script::sensitive(format!("{client} <<'SQLEOF'\n{sql}\nSQLEOF"));
        check(self.shell, "mysql root statements", &script).await?;
        Ok(())
    }
}

/// Escape a value for use inside a single-quoted SQL string literal.
pub fn sql_quote(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

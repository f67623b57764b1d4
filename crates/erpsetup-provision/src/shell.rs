use async_trait::async_trait;
use erpsetup_core::AppError;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;

/// A bash script to run on the host.
#[derive(Clone, PartialEq, Eq)]
pub struct Script {
    body: String,
    sensitive: bool,
}

impl Script {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sensitive: false,
        }
    }

    /// A script that carries a secret. It is never logged or displayed.
    pub fn sensitive(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            sensitive: true,
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Run this script as `user` through a login shell.
    /// Uses `su - <user> -c '...'` so only root privileges are needed.
    pub fn as_user(&self, user: &str) -> Script {
        Script {
            body: format!("su - {} -c {}", user, shell_quote(&self.body)),
            sensitive: self.sensitive,
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sensitive {
            f.write_str("<redacted>")
        } else {
            f.write_str(&self.body)
        }
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Script({self})")
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Everything the provisioning steps need from the host.
///
/// `exec` only fails when the script cannot be started; a non-zero exit is
/// reported through [`CommandOutput::status`]. Use [`check`] when a non-zero
/// exit must abort.
#[async_trait]
pub trait HostShell: Send + Sync {
    async fn exec(&self, script: &Script) -> Result<CommandOutput, AppError>;

    /// `Ok(None)` when the file does not exist.
    async fn read_file(&self, path: &Path) -> Result<Option<String>, AppError>;

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), AppError>;

    /// Append to a file, creating it when absent.
    async fn append_file(&self, path: &Path, contents: &str) -> Result<(), AppError>;

    /// Fails when the path cannot be inspected, as opposed to being absent.
    async fn exists(&self, path: &Path) -> Result<bool, AppError>;

    async fn download(&self, url: &str, dest: &Path) -> Result<(), AppError>;

    fn effective_uid(&self) -> u32;
}

/// Run a script and turn a non-zero exit into [`AppError::Command`].
/// Returns stdout on success.
pub async fn check(
    shell: &dyn HostShell,
    context: &str,
    script: &Script,
) -> Result<String, AppError> {
    tracing::debug!(%script, "{context}");
    let out = shell.exec(script).await?;
    if !out.success() {
        return Err(AppError::command(context, out.status, &out.stderr));
    }
    Ok(out.stdout)
}

/// Single-quote a string for bash.
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// The host this process runs on.
pub struct LocalShell {
    http: reqwest::Client,
}

impl LocalShell {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }
}

impl Default for LocalShell {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HostShell for LocalShell {
    async fn exec(&self, script: &Script) -> Result<CommandOutput, AppError> {
        let output = tokio::process::Command::new("bash")
            .arg("-c")
            .arg(script.body())
            .env("DEBIAN_FRONTEND", "noninteractive")
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    async fn read_file(&self, path: &Path) -> Result<Option<String>, AppError> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
        Ok(())
    }

    async fn append_file(&self, path: &Path, contents: &str) -> Result<(), AppError> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;
        file.write_all(contents.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool, AppError> {
        Ok(tokio::fs::try_exists(path).await?)
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), AppError> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        tokio::fs::write(dest, &bytes).await?;
        Ok(())
    }

    fn effective_uid(&self) -> u32 {
        #[cfg(unix)]
        {
            // SAFETY: geteuid has no preconditions and cannot fail.
            unsafe { libc::geteuid() }
        }
        #[cfg(not(unix))]
        {
            u32::MAX
        }
    }
}

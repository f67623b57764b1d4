use crate::shell::HostShell;
use erpsetup_core::config::{OS_RELEASE_PATH, SUPPORTED_OS_ID, SUPPORTED_OS_MAJOR};
use erpsetup_core::AppError;
use std::path::Path;

/// Distribution identity from /etc/os-release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub version_id: String,
    pub pretty_name: Option<String>,
}

impl OsRelease {
    pub fn parse(text: &str) -> Self {
        let mut id = String::new();
        let mut version_id = String::new();
        let mut pretty_name = None;
        for line in text.lines() {
            let Some((key, value)) = line.trim().split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'').to_string();
            match key {
                "ID" => id = value,
                "VERSION_ID" => version_id = value,
                "PRETTY_NAME" => pretty_name = Some(value),
                _ => {}
            }
        }
        Self {
            id,
            version_id,
            pretty_name,
        }
    }

    pub fn major_version(&self) -> Option<u32> {
        self.version_id.split('.').next()?.parse().ok()
    }
}

/// Refuse to continue unless running as root on a supported Ubuntu release.
/// Runs no commands and changes nothing.
pub async fn check(shell: &dyn HostShell) -> Result<OsRelease, AppError> {
    if shell.effective_uid() != 0 {
        return Err(AppError::Preflight(
            "this program must be run as root (try sudo)".into(),
        ));
    }

    let text = shell
        .read_file(Path::new(OS_RELEASE_PATH))
        .await?
        .ok_or_else(|| AppError::Preflight(format!("{OS_RELEASE_PATH} not found")))?;
    let os = OsRelease::parse(&text);

    if os.id != SUPPORTED_OS_ID {
        return Err(AppError::Preflight(format!(
            "unsupported distribution '{}', expected {SUPPORTED_OS_ID}",
            os.id
        )));
    }
    if os.major_version() != Some(SUPPORTED_OS_MAJOR) {
        return Err(AppError::Preflight(format!(
            "unsupported {SUPPORTED_OS_ID} version '{}', expected {SUPPORTED_OS_MAJOR}.x",
            os.version_id
        )));
    }
    Ok(os)
}

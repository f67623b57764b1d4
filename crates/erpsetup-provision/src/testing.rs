//! In-memory host used by the unit tests.

use crate::shell::{CommandOutput, HostShell, Script};
use async_trait::async_trait;
use erpsetup_core::AppError;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct Rule {
    pattern: String,
    output: CommandOutput,
    creates: Option<PathBuf>,
}

/// Records every script and answers by substring match. Scripts that match no
/// rule succeed with empty output.
pub struct FakeShell {
    euid: u32,
    files: Mutex<HashMap<PathBuf, String>>,
    dirs: Mutex<HashSet<PathBuf>>,
    rules: Vec<Rule>,
    execs: Mutex<Vec<String>>,
    downloads: Mutex<Vec<(String, PathBuf)>>,
}

impl FakeShell {
    pub fn root() -> Self {
        Self {
            euid: 0,
            files: Mutex::new(HashMap::new()),
            dirs: Mutex::new(HashSet::new()),
            rules: Vec::new(),
            execs: Mutex::new(Vec::new()),
            downloads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_euid(mut self, euid: u32) -> Self {
        self.euid = euid;
        self
    }

    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), contents.to_string());
        self
    }

    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.dirs.lock().unwrap().insert(path.as_ref().to_path_buf());
        self
    }

    pub fn respond(mut self, pattern: &str, status: i32, stdout: &str) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            output: CommandOutput {
                status,
                stdout: stdout.to_string(),
                stderr: if status == 0 { String::new() } else { format!("{pattern} failed") },
            },
            creates: None,
        });
        self
    }

    /// A successful script matching `pattern` makes `path` exist afterwards.
    pub fn creates(mut self, pattern: &str, path: impl AsRef<Path>) -> Self {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            output: CommandOutput::default(),
            creates: Some(path.as_ref().to_path_buf()),
        });
        self
    }

    pub fn execs(&self) -> Vec<String> {
        self.execs.lock().unwrap().clone()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.execs().iter().any(|s| s.contains(needle))
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }

    pub fn downloads(&self) -> Vec<(String, PathBuf)> {
        self.downloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostShell for FakeShell {
    async fn exec(&self, script: &Script) -> Result<CommandOutput, AppError> {
        self.execs.lock().unwrap().push(script.body().to_string());
        let Some(rule) = self
            .rules
            .iter()
            .find(|r| script.body().contains(&r.pattern))
        else {
            return Ok(CommandOutput::default());
        };
        if let Some(path) = &rule.creates {
            self.dirs.lock().unwrap().insert(path.clone());
        }
        Ok(rule.output.clone())
    }

    async fn read_file(&self, path: &Path) -> Result<Option<String>, AppError> {
        Ok(self.files.lock().unwrap().get(path).cloned())
    }

    async fn write_file(&self, path: &Path, contents: &str) -> Result<(), AppError> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    async fn append_file(&self, path: &Path, contents: &str) -> Result<(), AppError> {
        self.files
            .lock()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    async fn exists(&self, path: &Path) -> Result<bool, AppError> {
        let files = self.files.lock().unwrap();
        let dirs = self.dirs.lock().unwrap();
        Ok(files.contains_key(path)
            || dirs.contains(path)
            || files.keys().chain(dirs.iter()).any(|p| p.starts_with(path)))
    }

    async fn download(&self, url: &str, dest: &Path) -> Result<(), AppError> {
        self.downloads
            .lock()
            .unwrap()
            .push((url.to_string(), dest.to_path_buf()));
        Ok(())
    }

    fn effective_uid(&self) -> u32 {
        self.euid
    }
}

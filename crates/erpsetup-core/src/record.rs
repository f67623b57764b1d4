use crate::config;
use crate::error::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What a completed provisioning run did, persisted under ~/.erpsetup/runs/.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub site_name: String,
    pub bench_dir: String,
    pub service_user: String,
    pub applied_steps: Vec<String>,
    pub skipped_steps: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunRecord {
    pub fn new_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn save(&self) -> Result<PathBuf, AppError> {
        let dir = config::runs_dir()?;
        std::fs::create_dir_all(&dir)?;
        self.save_in(&dir)
    }

    pub fn save_in(&self, dir: &Path) -> Result<PathBuf, AppError> {
        let path = dir.join(format!("{}.json", self.id));
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

/// Load every record in ~/.erpsetup/runs/, newest first.
pub fn list() -> Result<Vec<RunRecord>, AppError> {
    list_in(&config::runs_dir()?)
}

pub fn list_in(dir: &Path) -> Result<Vec<RunRecord>, AppError> {
    let mut records = Vec::new();
    if !dir.exists() {
        return Ok(records);
    }
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let text = std::fs::read_to_string(&path)?;
        match serde_json::from_str::<RunRecord>(&text) {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!(path = %path.display(), "skipping unreadable run record: {e}"),
        }
    }
    records.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));
    Ok(records)
}

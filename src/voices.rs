//! On-disk store of synthesis voices.
//!
//! A voice is a directory of model artifacts plus a `voice.json` describing
//! where it came from. Cloning copies an existing voice directory under a
//! new name so it can be fine-tuned independently; nothing here touches the
//! running services, which pick up voices at load time.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, VostreamError};

const METADATA_FILE: &str = "voice.json";

/// Sidecar metadata stored inside each voice directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceMetadata {
    pub name: String,
    /// Name of the voice this one was cloned from, empty for originals.
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// One entry returned by [`VoiceStore::list`].
#[derive(Debug, Clone)]
pub struct VoiceEntry {
    pub name: String,
    pub path: PathBuf,
    pub metadata: Option<VoiceMetadata>,
}

pub struct VoiceStore {
    root: PathBuf,
}

impl VoiceStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All voices in the store, sorted by name. A directory without
    /// readable metadata still lists; the metadata is just absent.
    pub fn list(&self) -> Result<Vec<VoiceEntry>> {
        let mut entries = Vec::new();
        if !self.root.exists() {
            return Ok(entries);
        }
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            let metadata = fs::read_to_string(path.join(METADATA_FILE))
                .ok()
                .and_then(|raw| serde_json::from_str(&raw).ok());
            entries.push(VoiceEntry {
                name,
                path,
                metadata,
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Copy `source` to a new voice named `name`, writing fresh metadata
    /// that records the lineage.
    pub fn clone_voice(&self, source: &str, name: &str, description: &str) -> Result<VoiceEntry> {
        let source_dir = self.root.join(source);
        if !source_dir.is_dir() {
            return Err(VostreamError::VoiceSourceMissing {
                path: source_dir.display().to_string(),
            });
        }
        let target_dir = self.root.join(name);
        if target_dir.exists() {
            return Err(VostreamError::VoiceExists {
                name: name.to_string(),
            });
        }

        copy_dir(&source_dir, &target_dir)?;

        let metadata = VoiceMetadata {
            name: name.to_string(),
            source: source.to_string(),
            description: description.to_string(),
            created_at: humantime::format_rfc3339(SystemTime::now()).to_string(),
        };
        fs::write(
            target_dir.join(METADATA_FILE),
            serde_json::to_string_pretty(&metadata)?,
        )?;
        info!(voice = name, source, "voice cloned");

        Ok(VoiceEntry {
            name: name.to_string(),
            path: target_dir,
            metadata: Some(metadata),
        })
    }

    pub fn delete(&self, name: &str) -> Result<()> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(VostreamError::VoiceNotFound {
                name: name.to_string(),
            });
        }
        fs::remove_dir_all(&dir)?;
        info!(voice = name, "voice deleted");
        Ok(())
    }
}

fn copy_dir(source: &Path, target: &Path) -> Result<()> {
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let target_path = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target_path)?;
        } else {
            fs::copy(entry.path(), &target_path)?;
        }
    }
    Ok(())
}

// desi_store/src/store/file.rs

//! A store persisted as a single JSON object on disk.
//!
//! Used by the operator CLI so that a profile's data survives between
//! invocations. Every mutation rewrites the whole file through a sibling
//! temp file followed by a rename.

use crate::error::{StoreError, StoreResult};
use crate::store::KeyValueStore;
use anyhow::Context;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{event, instrument, Level};

#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
  /// Opens the store at `path`. A missing or blank file is an empty store.
  ///
  /// A file that does not decode is moved aside to `<name>.corrupt` and the
  /// store starts empty, so maintenance can still run against a damaged
  /// profile. Only IO failures are errors.
  #[instrument(name = "FileStore::open", skip_all, fields(path = %path.as_ref().display()), err(Display))]
  pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
    let path = path.as_ref().to_path_buf();
    let open_failed = |source: anyhow::Error| StoreError::Backend {
      op: "open",
      key: path.display().to_string(),
      source,
    };

    let entries = if path.exists() {
      let raw = fs::read_to_string(&path)
        .with_context(|| format!("reading {}", path.display()))
        .map_err(open_failed)?;
      if raw.trim().is_empty() {
        BTreeMap::new()
      } else {
        match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
          Ok(entries) => entries,
          Err(decode_err) => {
            let quarantine = Self::corrupt_path(&path);
            fs::rename(&path, &quarantine)
              .with_context(|| format!("moving undecodable {} aside", path.display()))
              .map_err(open_failed)?;
            event!(
              Level::WARN,
              error = %decode_err,
              moved_to = %quarantine.display(),
              "Store file did not decode; moved aside and starting empty."
            );
            BTreeMap::new()
          }
        }
      }
    } else {
      event!(Level::DEBUG, "Store file does not exist yet; starting empty.");
      BTreeMap::new()
    };
    event!(Level::DEBUG, keys = entries.len(), "Store file opened.");
    Ok(Self {
      path,
      entries: RwLock::new(entries),
    })
  }

  /// Where an undecodable store file is moved: `storage.json` becomes `storage.json.corrupt`.
  pub fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".corrupt");
    path.with_file_name(name)
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn persist(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
    if let Some(parent) = self.path.parent() {
      if !parent.as_os_str().is_empty() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
      }
    }
    let encoded = serde_json::to_string_pretty(entries).context("encoding store contents")?;
    // Rename is atomic on the same filesystem; a crash leaves either the old or the new file.
    let tmp = self.path.with_extension("json.tmp");
    fs::write(&tmp, encoded).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, &self.path).with_context(|| format!("replacing {}", self.path.display()))?;
    Ok(())
  }

  /// Applies `mutate` and persists; the in-memory map is restored if the write fails.
  fn mutate(&self, op: &'static str, key: &str, mutate: impl FnOnce(&mut BTreeMap<String, String>)) -> StoreResult<()> {
    // The write lock is held across the file write so readers never see a
    // change that has not reached disk.
    let mut guard = self.entries.write();
    let snapshot = guard.clone();
    mutate(&mut guard);
    if let Err(source) = self.persist(&guard) {
      // The rename never happened, so the file still matches `snapshot`.
      *guard = snapshot;
      event!(Level::ERROR, %op, %key, error = %source, "Persisting store file failed; change rolled back.");
      return Err(StoreError::Backend {
        op,
        key: key.to_string(),
        source,
      });
    }
    Ok(())
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.read().get(key).cloned())
  }

  fn set(&self, key: &str, value: &str) -> StoreResult<()> {
    self.mutate("set", key, |entries| {
      entries.insert(key.to_string(), value.to_string());
    })
  }

  fn remove(&self, key: &str) -> StoreResult<()> {
    if !self.entries.read().contains_key(key) {
      return Ok(());
    }
    self.mutate("remove", key, |entries| {
      entries.remove(key);
    })
  }

  fn keys(&self) -> StoreResult<Vec<String>> {
    Ok(self.entries.read().keys().cloned().collect())
  }

  fn clear(&self) -> StoreResult<()> {
    self.mutate("clear", "*", BTreeMap::clear)
  }
}

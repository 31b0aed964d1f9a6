pub mod models;
pub mod queries;

use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chirpy_types::error::{CoreError, CoreResult};
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::models::Snapshot;

/// Single-file JSON document store.
///
/// The whole [`Snapshot`] is the unit of persistence: it is read in full and
/// rewritten in full. A reader/writer lock serializes access to the backing
/// file within this process; nothing else may touch the file.
pub struct Database {
    path: PathBuf,
    lock: RwLock<()>,
}

impl Database {
    /// Open the store at `path`, creating an empty document if none exists.
    pub fn open(path: &Path) -> CoreResult<Self> {
        let db = Self {
            path: path.to_path_buf(),
            lock: RwLock::new(()),
        };
        db.ensure_exists()?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist an empty snapshot if the backing file is absent.
    pub fn ensure_exists(&self) -> CoreResult<()> {
        let _guard = self.lock.write();
        match fs::read(&self.path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No database at {}, creating", self.path.display());
                write_snapshot(&self.path, &Snapshot::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read the current snapshot under the shared lock.
    pub fn load(&self) -> CoreResult<Snapshot> {
        let _guard = self.lock.read();
        read_snapshot(&self.path)
    }

    /// Overwrite the document with `snapshot` under the exclusive lock.
    pub fn store(&self, snapshot: &Snapshot) -> CoreResult<()> {
        let _guard = self.lock.write();
        write_snapshot(&self.path, snapshot)
    }

    /// Delete the backing file and start over with an empty document.
    pub fn reset(&self) -> CoreResult<()> {
        let _guard = self.lock.write();
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        write_snapshot(&self.path, &Snapshot::default())?;

        info!("Database at {} reset", self.path.display());
        Ok(())
    }

    /// Run a read-only query against the current snapshot.
    pub fn with_snapshot<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&Snapshot) -> CoreResult<T>,
    {
        let snapshot = self.load()?;
        f(&snapshot)
    }

    /// Load, mutate and store as one transaction.
    ///
    /// The exclusive lock is held across the whole sequence, so concurrent
    /// mutations cannot overwrite each other. If `f` fails nothing is written.
    pub fn with_snapshot_mut<F, T>(&self, f: F) -> CoreResult<T>
    where
        F: FnOnce(&mut Snapshot) -> CoreResult<T>,
    {
        let _guard = self.lock.write();
        let mut snapshot = read_snapshot(&self.path)?;
        let out = f(&mut snapshot)?;
        write_snapshot(&self.path, &snapshot)?;
        Ok(out)
    }
}

fn read_snapshot(path: &Path) -> CoreResult<Snapshot> {
    let data = fs::read(path)?;
    let snapshot: Snapshot = serde_json::from_slice(&data).map_err(CoreError::CorruptData)?;
    snapshot
        .check_keys()
        .map_err(|msg| CoreError::CorruptData(serde::de::Error::custom(msg)))?;
    Ok(snapshot)
}

/// Write to a sibling temp file, then rename it over the live document so a
/// reader never observes a half-written file.
fn write_snapshot(path: &Path, snapshot: &Snapshot) -> CoreResult<()> {
    let data = serde_json::to_vec(snapshot)
        .map_err(|e| CoreError::Internal(format!("serialize snapshot: {}", e)))?;

    let tmp_path = temp_path(path);
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let replaced = options
        .open(&tmp_path)
        .and_then(|mut file| {
            file.write_all(&data)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = replaced {
        // the live document is untouched; don't leave the partial copy behind
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

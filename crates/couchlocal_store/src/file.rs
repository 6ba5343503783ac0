//! File-based document store for persistent targets.
//!
//! The store keeps an append-only JSON-lines log next to an advisory lock file:
//!
//! ```text
//! <path>            # one JSON document per line, later lines win
//! <path>.lock       # held exclusively while the store is open
//! <path>.compact    # temporary file, exists only during compaction
//! ```

use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::store::DocumentStore;
use fs2::FileExt;
use parking_lot::{Mutex, RwLock};
use serde_json::Value;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const LOCK_SUFFIX: &str = ".lock";
const COMPACT_SUFFIX: &str = ".compact";

/// Configuration for a [`FileDocumentStore`].
#[derive(Debug, Clone)]
pub struct FileStoreConfig {
    /// Path of the JSON-lines log.
    pub path: PathBuf,
    /// Whether to `fsync` after every write.
    pub sync_on_write: bool,
    /// Whether to create missing parent directories on open.
    pub create_dirs: bool,
}

impl FileStoreConfig {
    /// Creates a configuration for the log at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sync_on_write: true,
            create_dirs: true,
        }
    }

    /// Sets whether every write is synced to disk.
    pub fn with_sync_on_write(mut self, sync: bool) -> Self {
        self.sync_on_write = sync;
        self
    }

    /// Sets whether parent directories are created on open.
    pub fn with_create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }
}

/// A file-based document store.
///
/// Every `store` appends the full document body as one line of the log and
/// then updates an in-memory index, so reads never touch the disk. Opening
/// the store replays the log into the index.
///
/// # Durability
///
/// - Each write is flushed to the OS before `store` returns
/// - With `sync_on_write` (the default) each write is also `fsync`ed
/// - A torn final record (no trailing newline) is discarded on open
/// - A failed append is truncated away before the next write, so the log
///   never holds a torn record between complete ones
///
/// # Thread Safety
///
/// Writers are serialized by a single mutex around the log handle. Readers
/// only take the index lock and are not blocked by disk I/O.
///
/// # Example
///
/// ```no_run
/// use couchlocal_store::{Document, DocumentStore, FileDocumentStore, FileStoreConfig};
/// use serde_json::json;
///
/// let store = FileDocumentStore::open(FileStoreConfig::new("data/docs.jsonl")).unwrap();
/// let doc = Document::from_value(json!({"_id": "a", "_rev": "1-x"})).unwrap();
/// store.store(&doc).unwrap();
/// ```
#[derive(Debug)]
pub struct FileDocumentStore {
    config: FileStoreConfig,
    writer: Mutex<LogWriter>,
    docs: RwLock<HashMap<String, Document>>,
    _lock_file: File,
}

/// Write side of the log.
#[derive(Debug)]
struct LogWriter {
    file: File,
    /// Length of the log up to the end of its last complete record.
    committed: u64,
    /// Set while bytes of a failed append may remain past `committed`.
    dirty: bool,
}

impl LogWriter {
    fn new(file: File, committed: u64) -> Self {
        Self {
            file,
            committed,
            dirty: false,
        }
    }

    /// Appends one complete record at the committed end of the log.
    ///
    /// On failure the partial record is truncated. If that also fails the
    /// writer stays dirty and the next append retries the truncation first.
    fn append(&mut self, record: &[u8], sync: bool) -> io::Result<()> {
        if self.dirty {
            self.file.set_len(self.committed)?;
            self.dirty = false;
        }

        match self.write_at_end(record, sync) {
            Ok(()) => {
                self.committed += record.len() as u64;
                Ok(())
            }
            Err(e) => {
                self.dirty = true;
                match self.file.set_len(self.committed) {
                    Ok(()) => self.dirty = false,
                    Err(truncate) => warn!(
                        committed = self.committed,
                        error = %truncate,
                        "could not truncate failed append from store log"
                    ),
                }
                Err(e)
            }
        }
    }

    fn write_at_end(&mut self, record: &[u8], sync: bool) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(self.committed))?;
        self.file.write_all(record)?;
        self.file.flush()?;
        if sync {
            self.file.sync_data()?;
        }
        Ok(())
    }
}

impl FileDocumentStore {
    /// Opens or creates the store described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Another handle holds the lock ([`StoreError::Locked`])
    /// - A record other than the last one cannot be parsed ([`StoreError::Corrupted`])
    /// - An I/O error occurs
    pub fn open(config: FileStoreConfig) -> StoreResult<Self> {
        if config.create_dirs {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(sibling(&config.path, LOCK_SUFFIX))?;
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StoreError::Locked(config.path.clone()));
        }

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&config.path)?;
        let docs = replay(&mut file)?;
        let committed = file.seek(SeekFrom::End(0))?;

        info!(
            path = %config.path.display(),
            documents = docs.len(),
            "opened file document store"
        );

        Ok(Self {
            config,
            writer: Mutex::new(LogWriter::new(file, committed)),
            docs: RwLock::new(docs),
            _lock_file: lock_file,
        })
    }

    /// Opens the store at `path` with default settings.
    ///
    /// # Errors
    ///
    /// See [`FileDocumentStore::open`].
    pub fn open_path(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open(FileStoreConfig::new(path.as_ref()))
    }

    /// Returns the path of the log.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Returns the number of live documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    /// Returns true if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }

    /// Rewrites the log so it holds one record per live document.
    ///
    /// Returns the number of records written. The new log is written to a
    /// temporary file and renamed over the old one; the handle used to write
    /// it becomes the log writer, so later writes land in the renamed file.
    ///
    /// # Errors
    ///
    /// Returns an error if the temporary log cannot be written or renamed.
    /// The old log and writer are left untouched in that case.
    pub fn compact(&self) -> StoreResult<usize> {
        let mut writer = self.writer.lock();
        let docs = self.docs.read();
        let tmp = sibling(&self.config.path, COMPACT_SUFFIX);

        let mut ids: Vec<&String> = docs.keys().collect();
        ids.sort();

        let written = write_compacted(&tmp, ids.iter().map(|id| &docs[*id]))
            .and_then(|out| {
                fs::rename(&tmp, &self.config.path)?;
                Ok(out)
            });
        let (out, committed) = match written {
            Ok(out) => out,
            Err(e) => {
                // The temporary file may not exist.
                let _ = fs::remove_file(&tmp);
                return Err(e);
            }
        };
        *writer = LogWriter::new(out, committed);

        info!(
            path = %self.config.path.display(),
            documents = ids.len(),
            "compacted file document store"
        );
        Ok(ids.len())
    }
}

impl DocumentStore for FileDocumentStore {
    fn exists(&self, id: &str, rev: &str) -> bool {
        self.docs
            .read()
            .get(id)
            .is_some_and(|doc| doc.rev() == Some(rev))
    }

    fn get(&self, id: &str) -> Option<Document> {
        self.docs.read().get(id).cloned()
    }

    fn store(&self, doc: &Document) -> StoreResult<()> {
        let id = doc.require_id()?.to_owned();
        let mut record = serde_json::to_vec(doc.body())?;
        record.push(b'\n');

        let mut writer = self.writer.lock();
        if let Err(e) = writer.append(&record, self.config.sync_on_write) {
            warn!(id = %id, error = %e, "store log append failed");
            return Err(e.into());
        }
        // Index update stays under the writer lock so log order matches index order.
        self.docs.write().insert(id, doc.clone());
        Ok(())
    }
}

/// Writes `docs` to a fresh log at `path` and returns its synced handle and length.
fn write_compacted<'a>(
    path: &Path,
    docs: impl Iterator<Item = &'a Document>,
) -> StoreResult<(File, u64)> {
    let mut out = BufWriter::new(File::create(path)?);
    for doc in docs {
        serde_json::to_writer(&mut out, doc.body())?;
        out.write_all(b"\n")?;
    }
    let mut out = out.into_inner().map_err(|e| e.into_error())?;
    out.sync_all()?;
    let len = out.seek(SeekFrom::End(0))?;
    Ok((out, len))
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Rebuilds the index from the log and leaves `file` positioned at its end.
fn replay(file: &mut File) -> StoreResult<HashMap<String, Document>> {
    let mut bytes = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut bytes)?;

    let mut docs = HashMap::new();
    let mut offset = 0usize;
    let mut line = 0usize;

    while offset < bytes.len() {
        line += 1;
        let Some(len) = bytes[offset..].iter().position(|b| *b == b'\n') else {
            warn!(line, offset, "discarding torn record at end of store log");
            file.set_len(offset as u64)?;
            file.sync_all()?;
            break;
        };
        let record = &bytes[offset..offset + len];
        offset += len + 1;

        if record.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let (id, doc) =
            parse_record(record).map_err(|message| StoreError::Corrupted { line, message })?;
        docs.insert(id, doc);
    }

    file.seek(SeekFrom::End(0))?;
    Ok(docs)
}

fn parse_record(record: &[u8]) -> Result<(String, Document), String> {
    let value: Value = serde_json::from_slice(record).map_err(|e| e.to_string())?;
    let doc = Document::from_value(value).map_err(|e| e.to_string())?;
    let id = doc.require_id().map_err(|e| e.to_string())?.to_owned();
    Ok((id, doc))
}

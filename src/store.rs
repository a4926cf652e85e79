//! Storage backends that supply corpus snapshots.

use crate::corpus::CorpusSnapshot;
use crate::error::{DocsimError, Result};
use crate::input::DocumentKind;
use crate::types::Document;
use parking_lot::{Mutex, RwLock};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// A source of corpus snapshots.
///
/// `snapshot` must return one consistent view of the corpus; callers read
/// it once per request and never go back to the store mid-computation.
///
/// The `Send` and `Sync` bounds allow a store to be shared between
/// concurrent requests.
pub trait DocumentStore: Send + Sync {
  /// Reads the current corpus.
  ///
  /// # Errors
  ///
  /// Returns [`DocsimError::Storage`] when the corpus cannot be read.
  fn snapshot(&self) -> Result<CorpusSnapshot>;

  /// Retrieves one document by id.
  ///
  /// # Errors
  ///
  /// Returns [`DocsimError::Storage`] when the backend fails.
  fn get(&self, id: &str) -> Result<Option<Document>>;
}

/// In-memory store with copy-on-write snapshots.
///
/// Every mutation builds a new snapshot with the next version and swaps it
/// in under the write lock; snapshots already handed out stay untouched.
#[derive(Debug, Default)]
pub struct InMemoryStore {
  current: RwLock<CorpusSnapshot>,
}

impl InMemoryStore {
  /// Create a new empty in-memory store.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a document, or replaces the text of an existing id in place.
  ///
  /// Returns the new corpus version.
  pub fn put(&self, document: Document) -> u64 {
    let mut current = self.current.write();
    let mut documents = current.documents().to_vec();

    match documents.iter_mut().find(|doc| doc.id == document.id) {
      Some(existing) => existing.text = document.text,
      None => documents.push(document),
    }

    let version = current.version() + 1;
    *current = CorpusSnapshot::new(version, documents);
    version
  }

  /// Removes a document by id. Returns `false` if it was not present.
  pub fn remove(&self, id: &str) -> bool {
    let mut current = self.current.write();
    if !current.documents().iter().any(|doc| doc.id == id) {
      return false;
    }

    let documents = current
      .documents()
      .iter()
      .filter(|doc| doc.id != id)
      .cloned()
      .collect();
    *current = CorpusSnapshot::new(current.version() + 1, documents);
    true
  }

  /// Current corpus version.
  pub fn version(&self) -> u64 {
    self.current.read().version()
  }

  /// Number of stored documents.
  pub fn len(&self) -> usize {
    self.current.read().len()
  }

  /// Whether the store holds no documents.
  pub fn is_empty(&self) -> bool {
    self.current.read().is_empty()
  }
}

impl FromIterator<Document> for InMemoryStore {
  fn from_iter<I: IntoIterator<Item = Document>>(iter: I) -> Self {
    let store = Self::new();
    for document in iter {
      store.put(document);
    }
    store
  }
}

impl DocumentStore for InMemoryStore {
  fn snapshot(&self) -> Result<CorpusSnapshot> {
    Ok(self.current.read().clone())
  }

  fn get(&self, id: &str) -> Result<Option<Document>> {
    Ok(
      self
        .current
        .read()
        .documents()
        .iter()
        .find(|doc| doc.id == id)
        .cloned(),
    )
  }
}

/// Store backed by the `.txt` files of one directory.
///
/// Documents are identified by file name and ordered by it. Files that are
/// not valid UTF-8 are skipped. The version advances whenever the content
/// read differs from the previous read.
#[derive(Debug)]
pub struct DirectoryStore {
  root: PathBuf,
  seen: Mutex<SeenState>,
}

#[derive(Debug, Default)]
struct SeenState {
  fingerprint: Option<u64>,
  version: u64,
}

impl DirectoryStore {
  /// Creates a store over `root`. The directory is read lazily.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self {
      root: root.into(),
      seen: Mutex::new(SeenState::default()),
    }
  }

  /// The directory this store reads.
  pub fn root(&self) -> &Path {
    &self.root
  }

  fn read_text(path: &Path) -> Result<Option<String>> {
    let bytes = std::fs::read(path).map_err(|err| DocsimError::storage(path, err))?;
    match String::from_utf8(bytes) {
      Ok(text) => Ok(Some(text)),
      Err(_) => {
        tracing::warn!(path = %path.display(), "skipping non-UTF-8 document");
        Ok(None)
      }
    }
  }
}

impl DocumentStore for DirectoryStore {
  fn snapshot(&self) -> Result<CorpusSnapshot> {
    // Held across the read so versions follow the order listings were taken.
    let mut seen = self.seen.lock();
    let entries = std::fs::read_dir(&self.root).map_err(|err| DocsimError::storage(&self.root, err))?;

    let mut paths = Vec::new();
    for entry in entries {
      let path = entry.map_err(|err| DocsimError::storage(&self.root, err))?.path();
      if path.is_file() && DocumentKind::from_path(&path) == DocumentKind::Text {
        paths.push(path);
      }
    }
    paths.sort();

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
      let Some(text) = Self::read_text(&path)? else {
        continue;
      };
      let id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
      documents.push(Document::new(id, text));
    }

    let snapshot = CorpusSnapshot::new(0, documents);
    if seen.fingerprint != Some(snapshot.fingerprint()) {
      seen.fingerprint = Some(snapshot.fingerprint());
      seen.version += 1;
    }

    tracing::debug!(
      root = %self.root.display(),
      documents = snapshot.len(),
      version = seen.version,
      "read directory corpus"
    );
    Ok(snapshot.with_version(seen.version))
  }

  fn get(&self, id: &str) -> Result<Option<Document>> {
    // Ids are bare file names inside the root.
    if Path::new(id).file_name() != Some(OsStr::new(id)) {
      return Ok(None);
    }
    let path = self.root.join(id);
    if DocumentKind::from_path(&path) != DocumentKind::Text || !path.is_file() {
      return Ok(None);
    }
    Ok(Self::read_text(&path)?.map(|text| Document::new(id, text)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn test_in_memory_versions_and_order() {
    let store = InMemoryStore::new();
    assert_eq!(store.put(Document::new("b", "second")), 1);
    assert_eq!(store.put(Document::new("a", "first")), 2);
    let before = store.snapshot().unwrap();

    assert_eq!(store.put(Document::new("b", "second, edited")), 3);
    let after = store.snapshot().unwrap();

    let ids: Vec<&str> = after.documents().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(after.documents()[0].text, "second, edited");
    // Snapshots already handed out are not mutated.
    assert_eq!(before.documents()[0].text, "second");
    assert_eq!(before.version(), 2);
  }

  #[test]
  fn test_in_memory_remove() {
    let store: InMemoryStore = vec![Document::new("a", "x"), Document::new("b", "y")]
      .into_iter()
      .collect();
    assert!(store.remove("a"));
    assert!(!store.remove("a"));
    assert_eq!(store.len(), 1);
    assert_eq!(store.version(), 3);
    assert!(store.get("a").unwrap().is_none());
    assert_eq!(store.get("b").unwrap().map(|d| d.text), Some("y".to_string()));
  }

  #[test]
  fn test_directory_store_reads_text_files_sorted() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "bravo").unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    fs::write(dir.path().join("c.pdf"), "%PDF-1.4").unwrap();
    fs::write(dir.path().join("d.txt"), [0xff, 0xfe, 0xfd]).unwrap();
    fs::create_dir(dir.path().join("nested.txt")).unwrap();

    let store = DirectoryStore::new(dir.path());
    let snapshot = store.snapshot().unwrap();
    let ids: Vec<&str> = snapshot.documents().iter().map(|d| d.id.as_str()).collect();
    assert_eq!(ids, vec!["a.txt", "b.txt"]);
    assert_eq!(snapshot.version(), 1);

    assert_eq!(store.get("a.txt").unwrap().map(|d| d.text), Some("alpha".to_string()));
    assert!(store.get("c.pdf").unwrap().is_none());
    assert!(store.get("d.txt").unwrap().is_none());
  }

  #[test]
  fn test_directory_version_follows_content() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "alpha").unwrap();
    let store = DirectoryStore::new(dir.path());

    assert_eq!(store.snapshot().unwrap().version(), 1);
    assert_eq!(store.snapshot().unwrap().version(), 1);

    fs::write(dir.path().join("b.txt"), "bravo").unwrap();
    assert_eq!(store.snapshot().unwrap().version(), 2);
  }

  #[test]
  fn test_directory_get_stays_inside_root() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("corpus");
    fs::create_dir(&root).unwrap();
    fs::create_dir(root.join("sub")).unwrap();
    fs::write(dir.path().join("secret.txt"), "outside").unwrap();
    fs::write(root.join("sub").join("inner.txt"), "nested").unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();

    let store = DirectoryStore::new(&root);
    assert!(store.get("../secret.txt").unwrap().is_none());
    assert!(store.get("sub/inner.txt").unwrap().is_none());
    assert!(store.get("").unwrap().is_none());
    assert_eq!(store.get("a.txt").unwrap().map(|d| d.text), Some("alpha".to_string()));
  }

  #[test]
  fn test_directory_versions_grow_with_content() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path());
    fs::write(dir.path().join("doc_00.txt"), "seed").unwrap();

    let observed = parking_lot::Mutex::new(Vec::new());
    std::thread::scope(|scope| {
      scope.spawn(|| {
        for i in 1..20 {
          let staged = dir.path().join("staged.tmp");
          fs::write(&staged, "more").unwrap();
          fs::rename(&staged, dir.path().join(format!("doc_{i:02}.txt"))).unwrap();
        }
      });
      for _ in 0..4 {
        scope.spawn(|| {
          for _ in 0..20 {
            let snapshot = store.snapshot().unwrap();
            observed.lock().push((snapshot.version(), snapshot.len()));
          }
        });
      }
    });

    // Files are only added, so a newer version never lists fewer documents.
    let observed = observed.into_inner();
    for (version_a, len_a) in &observed {
      for (version_b, len_b) in &observed {
        if version_a < version_b {
          assert!(len_a < len_b);
        }
        if version_a == version_b {
          assert_eq!(len_a, len_b);
        }
      }
    }
  }

  #[test]
  fn test_missing_directory_is_storage_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryStore::new(dir.path().join("missing"));
    assert!(matches!(store.snapshot(), Err(DocsimError::Storage { .. })));
  }
}

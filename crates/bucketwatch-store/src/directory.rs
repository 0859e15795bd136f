use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bucketwatch_log::{Logger, Logging};
use bytes::Bytes;
use chrono::{DateTime, SecondsFormat, Utc};
use walkdir::{DirEntry, WalkDir};

use crate::error::{StoreError, StoreResult};
use crate::object::{ListPage, ListRequest, ObjectEntry};
use crate::page::paginate;
use crate::traits::ObjectLister;

/// Lists the regular files under a local directory as an object namespace.
///
/// Keys are `/`-separated paths relative to the root. The change marker is the
/// modification time (RFC 3339, nanosecond precision) joined with the file
/// size, so rewriting a file in place is detected as a change.
///
/// A request without a marker walks the tree and keeps the sorted result;
/// follow-up pages for the same prefix are cut from that snapshot, so one full
/// listing costs a single walk. Files created mid-listing show up on the next
/// listing from the start.
///
/// Files or subdirectories that cannot be read are logged and left out of the
/// listing. Only a missing or unreadable walk root fails the request.
#[derive(Clone)]
pub struct DirectoryLister {
    root: PathBuf,
    snapshot: Arc<Mutex<Option<Snapshot>>>,
    log: Logger,
}

struct Snapshot {
    prefix: String,
    entries: Arc<Vec<ObjectEntry>>,
}

impl DirectoryLister {
    pub fn new(root: impl Into<PathBuf>, logging: &Logging) -> Self {
        Self {
            root: root.into(),
            snapshot: Arc::new(Mutex::new(None)),
            log: logging.logger("directory"),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path under the root, rejecting escapes.
    fn resolve(&self, key: &str) -> StoreResult<PathBuf> {
        let relative = Path::new(key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.is_empty() || escapes {
            return Err(StoreError::InvalidRequest(format!("invalid key: {key:?}")));
        }
        Ok(self.root.join(relative))
    }

    /// The snapshot for a continuation request, if one was taken for `prefix`.
    fn cached(&self, prefix: &str) -> Option<Arc<Vec<ObjectEntry>>> {
        let snapshot = self.snapshot.lock().expect("lock poisoned");
        snapshot
            .as_ref()
            .filter(|s| s.prefix == prefix)
            .map(|s| Arc::clone(&s.entries))
    }

    async fn walk(&self, prefix: &str) -> StoreResult<Arc<Vec<ObjectEntry>>> {
        let root = self.root.clone();
        let owned_prefix = prefix.to_string();
        let log = self.log.clone();
        let mut entries = tokio::task::spawn_blocking(move || scan(&root, &owned_prefix, &log))
            .await
            .map_err(|e| StoreError::Unavailable(format!("directory scan aborted: {e}")))??;

        entries.sort_by(|a, b| a.key.cmp(&b.key));
        self.log.debug(format_args!(
            "scanned {} files under {}",
            entries.len(),
            self.root.display()
        ));

        let entries = Arc::new(entries);
        *self.snapshot.lock().expect("lock poisoned") = Some(Snapshot {
            prefix: prefix.to_string(),
            entries: Arc::clone(&entries),
        });
        Ok(entries)
    }
}

impl std::fmt::Debug for DirectoryLister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryLister")
            .field("root", &self.root)
            .finish()
    }
}

#[async_trait]
impl ObjectLister for DirectoryLister {
    async fn list(&self, request: &ListRequest) -> StoreResult<ListPage> {
        let entries = match request.marker {
            Some(_) => match self.cached(&request.prefix) {
                Some(entries) => entries,
                None => self.walk(&request.prefix).await?,
            },
            None => self.walk(&request.prefix).await?,
        };
        paginate(entries.iter().cloned(), request)
    }

    async fn get(&self, key: &str) -> StoreResult<Bytes> {
        let path = self.resolve(key)?;
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(key.to_string())),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

/// Collect every regular file under `root` whose key may start with `prefix`.
///
/// The walk starts at the deepest directory named by the prefix so that a
/// narrow prefix does not scan the whole tree.
fn scan(root: &Path, prefix: &str, log: &Logger) -> StoreResult<Vec<ObjectEntry>> {
    let start = match prefix.rfind('/') {
        Some(at) => {
            let dir = Path::new(&prefix[..at]);
            if dir.components().any(|c| !matches!(c, Component::Normal(_))) {
                return Err(StoreError::InvalidRequest(format!("invalid prefix: {prefix:?}")));
            }
            root.join(dir)
        }
        None => root.to_path_buf(),
    };
    if start != root && !start.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for item in WalkDir::new(&start).follow_links(false) {
        let item = match item {
            Ok(item) => item,
            Err(e) if e.depth() == 0 => return Err(io::Error::from(e).into()),
            Err(e) => {
                log.warn(format_args!("skipping unreadable entry: {e}"));
                continue;
            }
        };
        if !item.file_type().is_file() {
            continue;
        }
        let Some(key) = key_for(root, item.path()) else {
            log.warn(format_args!("skipping file with non UTF-8 path: {}", item.path().display()));
            continue;
        };
        if !key.starts_with(prefix) {
            continue;
        }
        match entry_for(key, &item) {
            Ok(entry) => entries.push(entry),
            Err(e) => log.warn(format_args!("skipping {}: {e}", item.path().display())),
        }
    }
    Ok(entries)
}

fn entry_for(key: String, item: &DirEntry) -> io::Result<ObjectEntry> {
    let metadata = item.metadata().map_err(io::Error::from)?;
    let modified: DateTime<Utc> = metadata.modified()?.into();
    let marker = format!(
        "{}/{}",
        modified.to_rfc3339_opts(SecondsFormat::Nanos, true),
        metadata.len()
    );
    Ok(ObjectEntry::new(key, marker, metadata.len()))
}

fn key_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        parts.push(component.as_os_str().to_str()?);
    }
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("logs/2024")).unwrap();
        fs::write(dir.path().join("a-c.txt"), b"top").unwrap();
        fs::write(dir.path().join("logs/2024/jan.log"), b"january").unwrap();
        fs::write(dir.path().join("logs/2024/feb.log"), b"february").unwrap();
        fs::write(dir.path().join("logs/readme"), b"hi").unwrap();
        dir
    }

    fn keys(page: &ListPage) -> Vec<&str> {
        page.entries.iter().map(|e| e.key.as_str()).collect()
    }

    #[tokio::test]
    async fn lists_files_in_key_order() {
        let dir = tree();
        let lister = DirectoryLister::new(dir.path(), &Logging::default());
        let page = lister.list(&ListRequest::new("")).await.unwrap();
        assert_eq!(
            keys(&page),
            vec!["a-c.txt", "logs/2024/feb.log", "logs/2024/jan.log", "logs/readme"]
        );
        assert_eq!(page.entries[2].size, 7);
        assert!(page.entries[2].marker.as_str().ends_with("/7"));
    }

    #[tokio::test]
    async fn prefix_narrows_the_walk() {
        let dir = tree();
        let lister = DirectoryLister::new(dir.path(), &Logging::default());
        let page = lister.list(&ListRequest::new("logs/2024/j")).await.unwrap();
        assert_eq!(keys(&page), vec!["logs/2024/jan.log"]);

        let missing = lister.list(&ListRequest::new("nope/x")).await.unwrap();
        assert!(missing.entries.is_empty());

        let escaping = lister.list(&ListRequest::new("../x")).await;
        assert!(matches!(escaping, Err(StoreError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn rewrite_changes_marker() {
        let dir = tree();
        let lister = DirectoryLister::new(dir.path(), &Logging::default());
        let before = lister.list(&ListRequest::new("a-c")).await.unwrap();
        fs::write(dir.path().join("a-c.txt"), b"longer content").unwrap();
        let after = lister.list(&ListRequest::new("a-c")).await.unwrap();
        assert_ne!(before.entries[0].marker, after.entries[0].marker);
    }

    #[tokio::test]
    async fn get_reads_file() {
        let dir = tree();
        let lister = DirectoryLister::new(dir.path(), &Logging::default());
        let data = lister.get("logs/2024/feb.log").await.unwrap();
        assert_eq!(data, Bytes::from_static(b"february"));
    }

    #[tokio::test]
    async fn get_missing_and_escaping_keys() {
        let dir = tree();
        let lister = DirectoryLister::new(dir.path(), &Logging::default());
        assert!(matches!(lister.get("nope").await, Err(StoreError::NotFound(_))));
        assert!(matches!(lister.get("../etc/passwd").await, Err(StoreError::InvalidRequest(_))));
        assert!(matches!(lister.get("").await, Err(StoreError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let lister = DirectoryLister::new(dir.path().join("gone"), &Logging::default());
        assert!(matches!(lister.list(&ListRequest::new("")).await, Err(StoreError::Io(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_subdirectory_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.txt"), b"ok").unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("hidden.txt"), b"x").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Permission bits do not apply to this user (root).
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let logging = Logging::default();
        let lister = DirectoryLister::new(dir.path(), &logging);
        let page = lister.list(&ListRequest::new("")).await;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(keys(&page.unwrap()), vec!["ok.txt"]);
        assert_eq!(logging.stats().warnings, 1);
    }

    #[tokio::test]
    async fn continuation_pages_reuse_the_first_walk() {
        let dir = tree();
        let lister = DirectoryLister::new(dir.path(), &Logging::default());
        let request = ListRequest::new("").with_max_keys(2);
        let first = lister.list(&request).await.unwrap();
        assert_eq!(keys(&first), vec!["a-c.txt", "logs/2024/feb.log"]);

        fs::write(dir.path().join("z.txt"), b"late").unwrap();
        let next = request.clone().with_marker(first.continuation().unwrap());
        let second = lister.list(&next).await.unwrap();
        assert_eq!(keys(&second), vec!["logs/2024/jan.log", "logs/readme"]);
        assert!(!second.is_truncated);

        let fresh = lister.list(&ListRequest::new("")).await.unwrap();
        assert_eq!(fresh.entries.last().unwrap().key, "z.txt");
    }

    #[tokio::test]
    async fn scans_are_logged_through_the_context() {
        let dir = tree();
        let logging = Logging::default();
        let lister = DirectoryLister::new(dir.path(), &logging);
        lister.list(&ListRequest::new("")).await.unwrap();
        assert_eq!(logging.stats().debugs, 1);
    }
}

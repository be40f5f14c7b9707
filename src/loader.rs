//! File Loader
//!
//! Read-through collaborator for `FileCache`: checks the cache, reads the
//! file from disk on a miss and hands the bytes back to the cache. The cache
//! itself never touches the filesystem.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use crate::cache::FileCache;
use crate::error::{CacheError, Result};

// == File Loader ==
/// Serves file contents from a root directory through a shared `FileCache`.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
    cache: Arc<FileCache>,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>, cache: Arc<FileCache>) -> Self {
        Self {
            root: root.into(),
            cache,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cache(&self) -> &Arc<FileCache> {
        &self.cache
    }

    // == Load ==
    /// Returns the contents of `relative` under the root directory.
    ///
    /// A cached copy is returned as is, without checking whether the file
    /// changed on disk. Files larger than the cache's byte budget are read
    /// and returned but never cached.
    pub async fn load(&self, relative: impl AsRef<Path>) -> Result<Bytes> {
        let key = sanitize(relative.as_ref())?;

        if let Some(bytes) = self.cache.get(&key)? {
            debug!(path = %key.display(), "File cache hit");
            return Ok(bytes);
        }

        let full_path = self.root.join(&key);
        let bytes = match tokio::fs::read(&full_path).await {
            Ok(data) => Bytes::from(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CacheError::NotFound(key.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        if bytes.len() as u64 <= self.cache.max_payload_bytes() {
            self.cache.put(key, bytes.clone(), None)?;
        } else {
            debug!(
                path = %key.display(),
                size = bytes.len(),
                "File exceeds cache budget, serving uncached"
            );
        }

        Ok(bytes)
    }

    // == Evict ==
    /// Drops the cached copy of `relative`, if any.
    pub fn evict(&self, relative: impl AsRef<Path>) -> Result<Option<Bytes>> {
        let key = sanitize(relative.as_ref())?;
        self.cache.remove(key)
    }
}

/// Normalizes a request path into a cache key relative to the root.
///
/// Rejects empty paths and anything that could step outside the root.
fn sanitize(relative: &Path) -> Result<PathBuf> {
    let mut key = PathBuf::new();

    for component in relative.components() {
        match component {
            Component::Normal(part) => key.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(CacheError::InvalidArgument(format!(
                    "Path '{}' escapes the file root",
                    relative.display()
                )));
            }
        }
    }

    if key.as_os_str().is_empty() {
        return Err(CacheError::InvalidArgument(
            "File path cannot be empty".to_string(),
        ));
    }

    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn loader_with_files(files: &[(&str, &[u8])], max_payload: u64) -> (FileLoader, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        for (name, contents) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, contents).unwrap();
        }
        let cache = Arc::new(FileCache::with_max_payload(100, max_payload));
        (FileLoader::new(dir.path(), cache), dir)
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(
            sanitize(Path::new("./docs/a.txt")).unwrap(),
            PathBuf::from("docs/a.txt")
        );
        assert!(matches!(
            sanitize(Path::new("../etc/passwd")),
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(
            sanitize(Path::new("/etc/passwd")),
            Err(CacheError::InvalidArgument(_))
        ));
        assert!(matches!(
            sanitize(Path::new(".")),
            Err(CacheError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_load_caches_on_miss() {
        let (loader, dir) = loader_with_files(&[("a.txt", &b"hello"[..])], 50);
        assert_eq!(loader.root(), dir.path());

        let bytes = loader.load("a.txt").await.unwrap();
        assert_eq!(&bytes[..], b"hello");
        assert!(loader.cache().contains("a.txt"));
        assert_eq!(loader.cache().used_size(), 5);

        // Served from cache even after the file changes on disk
        std::fs::write(dir.path().join("a.txt"), b"changed").unwrap();
        let bytes = loader.load("a.txt").await.unwrap();
        assert_eq!(&bytes[..], b"hello");

        let stats = loader.cache().stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let (loader, _dir) = loader_with_files(&[], 50);

        let result = loader.load("missing.txt").await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
        assert!(loader.cache().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_file_is_served_uncached() {
        let big = vec![b'z'; 64];
        let (loader, _dir) = loader_with_files(&[("big.bin", big.as_slice())], 50);

        let bytes = loader.load("big.bin").await.unwrap();
        assert_eq!(bytes.len(), 64);
        assert!(loader.cache().is_empty());
        assert_eq!(loader.cache().used_size(), 0);
    }

    #[tokio::test]
    async fn test_evict_then_reload_reads_disk() {
        let (loader, dir) = loader_with_files(&[("nested/b.txt", &b"one"[..])], 50);

        loader.load("nested/b.txt").await.unwrap();
        std::fs::write(dir.path().join("nested/b.txt"), b"two").unwrap();

        assert!(loader.evict("nested/b.txt").unwrap().is_some());
        assert!(loader.evict("nested/b.txt").unwrap().is_none());

        let bytes = loader.load("nested/b.txt").await.unwrap();
        assert_eq!(&bytes[..], b"two");
    }

    #[tokio::test]
    async fn test_load_rejects_traversal() {
        let (loader, _dir) = loader_with_files(&[], 50);
        let result = loader.load("../secret").await;
        assert!(matches!(result, Err(CacheError::InvalidArgument(_))));
    }
}

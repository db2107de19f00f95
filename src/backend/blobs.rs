use chrono::Utc;
use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// URL prefix under which stored blobs are served.
pub const URL_PREFIX: &str = "/uploads/";

const MAX_KEY_ATTEMPTS: u32 = 100;

/// Object storage for uploaded images, kept on local disk.
///
/// Objects live at `{prefix}/{timestamp_millis}_{filename}` (with a `-{n}`
/// after the timestamp when that key is taken); the retrieval
/// URL is that path under [`URL_PREFIX`].
#[derive(Clone, Debug)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store `bytes` and return the URL they can be fetched from.
    ///
    /// Keys are claimed with `create_new`, so two uploads of the same name in
    /// the same millisecond get distinct keys instead of overwriting each other.
    pub async fn put(&self, prefix: &str, filename: &str, bytes: &[u8]) -> io::Result<String> {
        let stamp = Utc::now().timestamp_millis();
        let name = sanitize_filename(filename);

        for attempt in 0..MAX_KEY_ATTEMPTS {
            let key = if attempt == 0 {
                format!("{}/{}_{}", prefix, stamp, name)
            } else {
                format!("{}/{}-{}_{}", prefix, stamp, attempt, name)
            };
            let path = self.root.join(&key);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e),
            };
            file.write_all(bytes).await?;
            file.flush().await?;

            tracing::info!("Stored blob {} ({} bytes)", key, bytes.len());
            return Ok(format!("{}{}", URL_PREFIX, key));
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free key for {}/{}", prefix, name),
        ))
    }

    /// Remove the object behind a retrieval URL. A missing object is not an error.
    pub async fn delete(&self, url: &str) -> io::Result<()> {
        let Some(path) = url.strip_prefix(URL_PREFIX).and_then(|key| self.resolve(key)) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a stored blob url: {}", url),
            ));
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Blob already gone: {}", url);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Map a storage key to a path inside the root, rejecting traversal.
    pub fn resolve(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.is_empty() || !safe {
            return None;
        }
        Some(self.root.join(relative))
    }
}

/// Keep a filename to ASCII letters, digits, `.`, `-` and `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize_filename("biryani.jpg"), "biryani.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\pics\\my dish.png"), "my_dish.png");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
        assert_eq!(sanitize_filename(""), "upload");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let store = BlobStore::new("/srv/uploads");
        assert_eq!(
            store.resolve("menu/1_a.jpg"),
            Some(PathBuf::from("/srv/uploads/menu/1_a.jpg"))
        );
        assert_eq!(store.resolve("../secret"), None);
        assert_eq!(store.resolve("/etc/passwd"), None);
        assert_eq!(store.resolve(""), None);
    }

    #[tokio::test]
    async fn put_then_delete() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BlobStore::new(tmp.path());

        let url = store.put("gallery", "dining room.jpg", b"jpeg").await.unwrap();
        assert!(url.starts_with("/uploads/gallery/"));
        assert!(url.ends_with("_dining_room.jpg"));

        let path = store.resolve(url.strip_prefix(URL_PREFIX).unwrap()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"jpeg");

        store.delete(&url).await.unwrap();
        assert!(!path.exists());

        // Second delete is a no-op
        store.delete(&url).await.unwrap();
    }

    #[tokio::test]
    async fn same_name_uploads_keep_both_objects() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BlobStore::new(tmp.path());

        let bodies: [&[u8]; 3] = [b"first", b"second", b"third"];
        let mut urls = Vec::new();
        for body in bodies {
            urls.push(store.put("gallery", "photo.jpg", body).await.unwrap());
        }
        assert_ne!(urls[0], urls[1]);
        assert_ne!(urls[1], urls[2]);
        assert_ne!(urls[0], urls[2]);

        for (url, body) in urls.iter().zip(bodies) {
            assert!(url.ends_with("_photo.jpg"));
            let path = store.resolve(url.strip_prefix(URL_PREFIX).unwrap()).unwrap();
            assert_eq!(std::fs::read(&path).unwrap(), body);
        }
    }

    #[tokio::test]
    async fn taken_key_gets_a_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BlobStore::new(tmp.path());

        // Pre-claim every plain key this millisecond range could produce.
        let now = Utc::now().timestamp_millis();
        std::fs::create_dir_all(tmp.path().join("menu")).unwrap();
        for stamp in now..now + 1000 {
            std::fs::write(tmp.path().join(format!("menu/{}_dosa.jpg", stamp)), b"old").unwrap();
        }

        let url = store.put("menu", "dosa.jpg", b"new").await.unwrap();
        assert!(url.ends_with("-1_dosa.jpg"), "got {}", url);
        let path = store.resolve(url.strip_prefix(URL_PREFIX).unwrap()).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn delete_rejects_foreign_urls() {
        let tmp = tempfile::tempdir().unwrap();
        let store = BlobStore::new(tmp.path());
        assert!(store.delete("https://example.com/a.jpg").await.is_err());
    }
}

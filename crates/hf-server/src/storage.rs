//! Filesystem storage for uploaded frame images.
//!
//! Files live under `{root}/frames/`. Records reference them by the
//! root-relative path (`frames/<file>`), which is also the suffix of the
//! public media URL.

use std::path::{Component, Path, PathBuf};

use hf_core::{Error, Result};
use rand::distributions::Alphanumeric;
use rand::Rng;
use tokio::io::AsyncWriteExt;

/// Directory (relative to the media root) that holds frame uploads.
pub const UPLOAD_DIR: &str = "frames";

/// Attempts at finding a free file name before giving up.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Filesystem manager for frame images rooted at the media directory.
#[derive(Debug, Clone)]
pub struct FrameStorage {
    root: PathBuf,
}

impl FrameStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The media root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `data` under `frames/` and return the root-relative path.
    ///
    /// The client-supplied name is sanitized; if the resulting name is taken,
    /// a random suffix is inserted before the extension. Existing files are
    /// never overwritten.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> Result<String> {
        let dir = self.root.join(UPLOAD_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let wanted = sanitize_file_name(file_name);
        let (stem, ext) = split_extension(&wanted);

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let candidate = if attempt == 0 {
                wanted.clone()
            } else {
                format!("{stem}_{}{ext}", random_suffix())
            };
            let path = dir.join(&candidate);

            let mut file = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(f) => f,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, data).await {
                drop(file);
                let _ = tokio::fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::debug!(path = %path.display(), bytes = data.len(), "Stored upload");
            return Ok(format!("{UPLOAD_DIR}/{candidate}"));
        }

        Err(Error::Internal(format!(
            "No free file name for upload '{wanted}' after {MAX_NAME_ATTEMPTS} attempts"
        )))
    }

    /// Resolve a root-relative path to its location on disk.
    ///
    /// Only plain relative paths are accepted; absolute paths and `..`
    /// components are rejected so a record can never point outside the root.
    pub fn absolute(&self, relative: &str) -> Result<PathBuf> {
        let rel = Path::new(relative);
        let plain = !relative.is_empty()
            && rel.components().all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            return Err(Error::Internal(format!(
                "Refusing to resolve stored path '{relative}'"
            )));
        }
        Ok(self.root.join(rel))
    }

    /// Remove the stored file if it exists.
    ///
    /// Returns `true` when a file was removed and `false` when there was no
    /// regular file at the path. Any other I/O failure is returned.
    pub async fn remove(&self, relative: &str) -> Result<bool> {
        let path = self.absolute(relative)?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Ok(false),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        }

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::debug!(path = %path.display(), "Removed stored file");
                Ok(true)
            }
            // Lost a race with another deletion.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}

/// Strip any directory part from a client-supplied file name.
pub fn base_name(file_name: &str) -> &str {
    file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name)
}

/// Split a file name into `(stem, extension)` where the extension keeps its
/// leading dot.
///
/// Only the last extension is split off, and leading dots never start an
/// extension: `a.tar.gz` → (`a.tar`, `.gz`), `.hidden` → (`.hidden`, ``).
pub fn split_extension(name: &str) -> (&str, &str) {
    let Some(dot) = name.rfind('.') else {
        return (name, "");
    };
    if name[..dot].chars().all(|c| c == '.') {
        return (name, "");
    }
    name.split_at(dot)
}

/// Reduce a client-supplied name to a safe file name: base name only,
/// whitespace replaced by `_`, and anything outside `[A-Za-z0-9._-]`
/// dropped. A result without a stem is given the stem `upload`.
pub fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = base_name(file_name)
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                Some(c)
            } else {
                None
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        "upload".to_string()
    } else if cleaned.starts_with('.') {
        // No stem left: never store a dotfile.
        format!("upload{cleaned}")
    } else {
        cleaned
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(7)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_extension_cases() {
        assert_eq!(split_extension("sunset.jpg"), ("sunset", ".jpg"));
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", ".gz"));
        assert_eq!(split_extension(".hidden"), (".hidden", ""));
        assert_eq!(split_extension("..odd.png"), ("..odd", ".png"));
        assert_eq!(split_extension("noext"), ("noext", ""));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
    }

    #[test]
    fn base_name_strips_directories() {
        assert_eq!(base_name("photos/2024/beach.png"), "beach.png");
        assert_eq!(base_name(r"C:\Users\me\beach.png"), "beach.png");
        assert_eq!(base_name("beach.png"), "beach.png");
    }

    #[test]
    fn sanitize() {
        assert_eq!(sanitize_file_name("My Photo (1).jpg"), "My_Photo_1.jpg");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("日本.png"), "upload.png");
        assert_eq!(sanitize_file_name(".hidden"), "upload.hidden");
        assert_eq!(sanitize_file_name("???"), "upload");
        assert_eq!(sanitize_file_name(".."), "upload");
    }

    #[tokio::test]
    async fn save_writes_under_frames_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FrameStorage::new(dir.path().to_path_buf());

        let rel = storage.save("beach.png", b"data").await.unwrap();
        assert_eq!(rel, "frames/beach.png");
        let on_disk = std::fs::read(dir.path().join("frames/beach.png")).unwrap();
        assert_eq!(on_disk, b"data");
    }

    #[tokio::test]
    async fn save_never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FrameStorage::new(dir.path().to_path_buf());

        let first = storage.save("beach.png", b"one").await.unwrap();
        let second = storage.save("beach.png", b"two").await.unwrap();
        assert_ne!(first, second);
        assert!(second.starts_with("frames/beach_"));
        assert!(second.ends_with(".png"));
        assert_eq!(std::fs::read(dir.path().join(&first)).unwrap(), b"one");
        assert_eq!(std::fs::read(dir.path().join(&second)).unwrap(), b"two");
    }

    #[tokio::test]
    async fn stemless_names_collide_before_the_extension() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FrameStorage::new(dir.path().to_path_buf());

        let first = storage.save("日本.png", b"one").await.unwrap();
        let second = storage.save("中国.png", b"two").await.unwrap();
        assert_eq!(first, "frames/upload.png");
        assert!(second.starts_with("frames/upload_"));
        assert!(second.ends_with(".png"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FrameStorage::new(dir.path().to_path_buf());

        let rel = storage.save("gone.png", b"x").await.unwrap();
        assert!(storage.remove(&rel).await.unwrap());
        assert!(!dir.path().join(&rel).exists());
        assert!(!storage.remove(&rel).await.unwrap());
    }

    #[tokio::test]
    async fn remove_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("frames/nested")).unwrap();
        let storage = FrameStorage::new(dir.path().to_path_buf());
        assert!(!storage.remove("frames/nested").await.unwrap());
        assert!(dir.path().join("frames/nested").is_dir());
    }

    #[test]
    fn absolute_rejects_escapes() {
        let storage = FrameStorage::new(PathBuf::from("/media"));
        assert_eq!(
            storage.absolute("frames/a.png").unwrap(),
            PathBuf::from("/media/frames/a.png")
        );
        assert!(storage.absolute("../secret").is_err());
        assert!(storage.absolute("/etc/passwd").is_err());
        assert!(storage.absolute("frames/../../x").is_err());
        assert!(storage.absolute("").is_err());
    }
}

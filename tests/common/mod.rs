//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates an in-memory DB, a temporary media
//! root, and a full [`AppContext`]. The [`TestHarness::with_server`]
//! constructor starts Axum on a random port for HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;

use hf_core::config::Config;
use hf_db::pool::{init_memory_pool, DbPool};
use hf_server::context::AppContext;
use hf_server::router::build_router;
use tempfile::TempDir;

/// Smallest byte sequence recognised as a PNG image.
pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by an
/// in-memory database and a temporary media directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub db: DbPool,
    pub media: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The media root is
    /// always replaced by a fresh temporary directory.
    pub fn with_config(mut config: Config) -> Self {
        let media = tempfile::tempdir().expect("failed to create media dir");
        config.media.root = media.path().to_path_buf();
        let db = init_memory_pool().expect("failed to create in-memory pool");
        let ctx = AppContext::from_pool(config, db.clone());
        Self { ctx, db, media }
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::serve(Self::new()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        Self::serve(Self::with_config(config)).await
    }

    async fn serve(harness: Self) -> (Self, SocketAddr) {
        let app = build_router(harness.ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }

    /// Absolute path of a storage-relative file under the media root.
    pub fn media_path(&self, relative: &str) -> std::path::PathBuf {
        self.media.path().join(relative)
    }

    /// Whether the `frames/` upload folder holds a file named `name`.
    pub fn has_stored(&self, name: &str) -> bool {
        self.media.path().join("frames").join(name).is_file()
    }

    /// Number of files currently stored under `frames/`.
    pub fn stored_count(&self) -> usize {
        let dir = self.media.path().join("frames");
        if !Path::new(&dir).exists() {
            return 0;
        }
        std::fs::read_dir(dir).expect("read frames dir").count()
    }
}

/// Build a multipart form with one `photos` part per `(file_name, bytes)`.
pub fn photos_form(files: &[(&str, &'static [u8])]) -> reqwest::multipart::Form {
    files
        .iter()
        .fold(reqwest::multipart::Form::new(), |form, (name, data)| {
            form.part(
                "photos",
                reqwest::multipart::Part::bytes(*data).file_name(name.to_string()),
            )
        })
}

/// Upload files through the API and return the created frames.
pub async fn upload(addr: SocketAddr, files: &[(&str, &'static [u8])]) -> Vec<serde_json::Value> {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/core/frames/"))
        .multipart(photos_form(files))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 201);
    resp.json().await.unwrap()
}

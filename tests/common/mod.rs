//! Shared test helpers: a SQLite catalog and a local object store in a temp directory,
//! wrapped so tests can count the calls each workflow makes.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use photoapp::config::{Config, DatabaseDriver, RdsConfig, S3Config, StorageBackend};
use photoapp::object_store::{LocalStore, ObjectStore, ObjectStoreError};
use photoapp::storage::{DataAccess, DatabaseError, Fetched, Row, SqlValue, SqliteDatabase};
use photoapp::viewer::{decode_image, ImageViewer, ViewerError};
use photoapp::AppState;

/// Counts every statement sent to the catalog.
pub struct CountingDb {
    inner: SqliteDatabase,
    pub reads: AtomicUsize,
    pub writes: AtomicUsize,
}

impl CountingDb {
    pub fn calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst) + self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataAccess for CountingDb {
    async fn fetch_one(&self, sql: &str, params: &[SqlValue]) -> Fetched<Row> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_one(sql, params).await
    }

    async fn fetch_all(&self, sql: &str, params: &[SqlValue]) -> Fetched<Vec<Row>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_all(sql, params).await
    }

    async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64, DatabaseError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.execute(sql, params).await
    }

    fn last_insert_id_sql(&self) -> &'static str {
        self.inner.last_insert_id_sql()
    }
}

/// A catalog whose every statement fails, as when the database connection drops mid-session.
pub struct FailingDb;

fn connection_lost() -> DatabaseError {
    sqlx::Error::PoolClosed.into()
}

#[async_trait]
impl DataAccess for FailingDb {
    async fn fetch_one(&self, _sql: &str, _params: &[SqlValue]) -> Fetched<Row> {
        Fetched::Failed(connection_lost())
    }

    async fn fetch_all(&self, _sql: &str, _params: &[SqlValue]) -> Fetched<Vec<Row>> {
        Fetched::Failed(connection_lost())
    }

    async fn execute(&self, _sql: &str, _params: &[SqlValue]) -> Result<u64, DatabaseError> {
        Err(connection_lost())
    }

    fn last_insert_id_sql(&self) -> &'static str {
        "SELECT last_insert_rowid()"
    }
}

/// Counts puts and gets against the local object store.
pub struct CountingStore {
    inner: LocalStore,
    pub puts: AtomicUsize,
    pub gets: AtomicUsize,
}

impl CountingStore {
    pub fn calls(&self) -> usize {
        self.puts.load(Ordering::SeqCst) + self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ObjectStore for CountingStore {
    async fn put(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), ObjectStoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, data, content_type).await
    }

    async fn get(&self, key: &str) -> Result<Bytes, ObjectStoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(key).await
    }

    async fn count(&self) -> Result<u64, ObjectStoreError> {
        self.inner.count().await
    }
}

/// Decodes like the real viewer but records paths instead of launching anything.
#[derive(Default)]
pub struct RecordingViewer {
    pub shown: Mutex<Vec<PathBuf>>,
}

impl ImageViewer for RecordingViewer {
    fn show(&self, path: &Path) -> Result<(), ViewerError> {
        decode_image(path)?;
        self.shown.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}

pub struct TestEnv {
    pub dir: tempfile::TempDir,
    pub state: AppState,
    pub db: Arc<CountingDb>,
    pub store: Arc<CountingStore>,
    pub viewer: Arc<RecordingViewer>,
}

impl TestEnv {
    /// Directory for files the tests upload from.
    pub fn inbox(&self) -> PathBuf {
        self.dir.path().join("inbox")
    }

    /// Write a local file to upload and return its path.
    pub fn local_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.inbox().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.dir.path().join("objects")
    }
}

pub fn test_config(dir: &Path) -> Config {
    Config {
        s3: S3Config {
            bucket_name: "photoapp-test".to_string(),
            backend: StorageBackend::Local,
            local_path: dir.join("objects").to_string_lossy().to_string(),
        },
        credentials: None,
        rds: RdsConfig {
            endpoint: "localhost".to_string(),
            port_number: 3306,
            user_name: "photoapp".to_string(),
            user_pwd: "photoapp".to_string(),
            db_name: dir.join("catalog.db").to_string_lossy().to_string(),
            driver: DatabaseDriver::Sqlite,
        },
    }
}

pub async fn test_env() -> TestEnv {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let db = Arc::new(CountingDb {
        inner: SqliteDatabase::open(&config.rds.db_name)
            .await
            .expect("Failed to open test database"),
        reads: AtomicUsize::new(0),
        writes: AtomicUsize::new(0),
    });
    let store = Arc::new(CountingStore {
        inner: LocalStore::new(&config.s3.local_path).expect("Failed to create test object store"),
        puts: AtomicUsize::new(0),
        gets: AtomicUsize::new(0),
    });
    let viewer = Arc::new(RecordingViewer::default());

    let download_dir = dir.path().join("downloads");
    std::fs::create_dir_all(&download_dir).unwrap();
    std::fs::create_dir_all(dir.path().join("inbox")).unwrap();

    let state = AppState {
        config,
        db: db.clone(),
        object_store: store.clone(),
        viewer: viewer.clone(),
        download_dir,
    };

    TestEnv {
        dir,
        state,
        db,
        store,
        viewer,
    }
}

/// Bytes of a small valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::new(8, 6))
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// An `AppState` over a working local store and a catalog that fails every statement.
pub fn failing_db_state(dir: &Path) -> AppState {
    let config = test_config(dir);
    let store = LocalStore::new(&config.s3.local_path).expect("Failed to create test object store");
    AppState {
        config,
        db: Arc::new(FailingDb),
        object_store: Arc::new(store),
        viewer: Arc::new(RecordingViewer::default()),
        download_dir: dir.to_path_buf(),
    }
}

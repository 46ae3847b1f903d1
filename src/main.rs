use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use photoapp::{
    config::{Config, ConfigError, DatabaseDriver, StorageBackend, DEFAULT_CONFIG_FILE},
    object_store as obj,
    shell::{Prompter, Shell, TerminalPrompter},
    storage::{DataAccess, MySqlDatabase, SqliteDatabase},
    viewer::SystemViewer,
    AppState,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing; stdout belongs to the interactive session
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());

    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    match log_format.to_lowercase().as_str() {
        "gcp" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_stackdriver::layer())
                .init();
        }
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_span_list(false)
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "photoapp starting");

    println!("** Welcome to PhotoApp **");
    println!();

    let mut prompter = TerminalPrompter;

    println!("What config file to use for this session?");
    println!("Press ENTER to use default ({DEFAULT_CONFIG_FILE}),");
    println!("otherwise enter name of config file>");
    let answer = prompter.read_line("")?.unwrap_or_default();
    let config_file = match answer.trim() {
        "" => DEFAULT_CONFIG_FILE.to_string(),
        name => name.to_string(),
    };

    // Load configuration
    let config = match Config::load(&config_file) {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => {
            println!("**ERROR: config file '{config_file}' does not exist, exiting");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    info!(config_file = %config_file, bucket = %config.s3.bucket_name, "Loaded configuration");

    // Initialize object store backend
    let object_store: Arc<dyn obj::ObjectStore> = match config.s3.backend {
        StorageBackend::Local => {
            let store = obj::LocalStore::new(&config.s3.local_path)?;
            info!(
                "Using local storage backend at: {}",
                config.s3.local_path
            );
            Arc::new(store)
        }
        StorageBackend::S3 => {
            let store = obj::S3Store::new(&config.s3.bucket_name, config.credentials.as_ref())?;
            info!("Using S3 storage backend, bucket: {}", config.s3.bucket_name);
            Arc::new(store)
        }
    };

    // Connect to the catalog database
    let db: Result<Arc<dyn DataAccess>, _> = match config.rds.driver {
        DatabaseDriver::Mysql => MySqlDatabase::connect(&config.rds)
            .await
            .map(|db| Arc::new(db) as Arc<dyn DataAccess>),
        DatabaseDriver::Sqlite => SqliteDatabase::open(&config.rds.db_name)
            .await
            .map(|db| Arc::new(db) as Arc<dyn DataAccess>),
    };
    let db = match db {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, endpoint = %config.rds.endpoint, "Database connection failed");
            println!("**ERROR: unable to connect to database, exiting");
            return Ok(());
        }
    };

    let state = AppState {
        config,
        db,
        object_store,
        viewer: Arc::new(SystemViewer),
        download_dir: std::env::current_dir()?,
    };

    Shell::new(&state, prompter, std::io::stdout().lock())
        .run()
        .await?;

    info!("Session ended");
    Ok(())
}

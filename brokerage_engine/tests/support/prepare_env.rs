use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

/// Loads `.env.test`, starts logging and creates an empty database at a random location. Returns the database url.
pub async fn prepare_test_env() -> String {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    debug!("🚀️ Logging initialised");
    let url = random_db_path();
    create_database(&url).await;
    url
}

pub fn random_db_path() -> String {
    let path = std::env::temp_dir().join(format!("brokerage_test_{}.db", rand::random::<u64>()));
    format!("sqlite://{}", path.display())
}

pub async fn create_database(url: &str) {
    if Sqlite::database_exists(url).await.unwrap_or(false) {
        if let Err(e) = Sqlite::drop_database(url).await {
            warn!("🚀️ Error dropping database {url}: {e:?}");
        }
    }
    Sqlite::create_database(url).await.expect("Error creating database");
    info!("🚀️ Created Sqlite database {url}");
}

pub async fn remove_database(url: &str) {
    if let Err(e) = Sqlite::drop_database(url).await {
        warn!("🚀️ Could not remove database {url}: {e:?}");
    }
}

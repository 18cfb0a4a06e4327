//! Voter Lookup Portal Server Entry Point

use clap::Parser;
use sqlx::sqlite::SqliteConnectOptions;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use vlookup::config::{get_env, GeoConfig, RegistryConfig, SessionConfig};
use vlookup::{auth, db, enrich, logging, registry, server, AppState};

/// CLI定義
#[derive(Parser)]
#[command(name = "vlookup", version, about = "Citizen-facing voter information lookup portal")]
struct Cli {
    /// バインドするホスト
    #[arg(long, env = "VLOOKUP_HOST", default_value = "0.0.0.0")]
    host: String,

    /// バインドするポート
    #[arg(long, env = "VLOOKUP_PORT", default_value_t = 8080)]
    port: u16,
}

#[derive(Clone)]
struct ServerConfig {
    host: String,
    port: u16,
}

impl ServerConfig {
    fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

async fn init_db_pool(database_url: &str) -> sqlx::Result<sqlx::SqlitePool> {
    // SQLiteファイルはディレクトリが存在しないと作成できないため、先に作成しておく
    if let Some(path) = database_url.strip_prefix("sqlite:") {
        // `sqlite::memory:` のような特殊指定はスキップ
        if !path.starts_with(':') {
            let normalized = path.trim_start_matches("//");
            let path_without_params = normalized.split('?').next().unwrap_or(normalized);
            let db_path = std::path::Path::new(path_without_params);
            if let Some(parent) = db_path.parent() {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    panic!(
                        "Failed to create database directory {}: {}",
                        parent.display(),
                        err
                    );
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    sqlx::SqlitePool::connect_with(connect_options).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init().expect("failed to initialize logging");

    info!("Voter Lookup Portal v{}", env!("CARGO_PKG_VERSION"));

    // clapの`env`属性によりVLOOKUP_HOST/VLOOKUP_PORTも反映される
    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
    };

    // データベース接続プールを最初に作成（他コンポーネントが依存）
    let database_url = get_env("VLOOKUP_DATABASE_URL").unwrap_or_else(|| {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .expect("Failed to get home directory");
        format!("sqlite:{}/.vlookup/vlookup.db", home)
    });

    let db_pool = init_db_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    // マイグレーションを実行
    db::migrations::run_migrations(&db_pool)
        .await
        .expect("Failed to run database migrations");

    // 管理者クレデンシャルが存在しない場合は作成
    auth::bootstrap::ensure_admin_exists(&db_pool)
        .await
        .expect("Failed to ensure admin credential exists");

    // HTTPクライアント（接続プーリング有効）を作成
    let http_client = reqwest::Client::builder()
        .pool_max_idle_per_host(32)
        .pool_idle_timeout(std::time::Duration::from_secs(60))
        .tcp_keepalive(std::time::Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client");

    let registry_client =
        registry::RegistryClient::new(http_client.clone(), RegistryConfig::from_env());
    let geo_locator = enrich::geo::GeoLocator::new(http_client.clone(), GeoConfig::from_env());
    let search_logs = Arc::new(db::search_logs::SearchLogStorage::new(db_pool.clone()));

    info!("Storage and upstream clients initialized");

    let state = AppState {
        db_pool,
        http_client,
        registry: registry_client,
        geo: geo_locator,
        search_logs,
        session: SessionConfig::from_env(),
    };

    server::run(state, &config.bind_addr()).await;
}

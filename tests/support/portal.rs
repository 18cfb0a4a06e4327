use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use vlookup::config::{GeoConfig, RegistryConfig, SessionConfig};
use vlookup::db::search_logs::SearchLogStorage;
use vlookup::enrich::geo::GeoLocator;
use vlookup::registry::RegistryClient;
use vlookup::{api, AppState};

use super::http::{spawn_server, TestServer};

/// テスト用のSQLiteデータベースプールを作成する
///
/// インメモリDBは接続ごとに別インスタンスになるため、接続数を1に固定する。
pub async fn create_test_db_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory SQLite pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// テスト用ポータルのハンドル
#[allow(dead_code)]
pub struct TestPortal {
    pub server: TestServer,
    pub db_pool: SqlitePool,
    pub search_logs: Arc<SearchLogStorage>,
}

#[allow(dead_code)]
impl TestPortal {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.server.addr())
    }

    pub async fn stop(self) {
        self.server.stop().await;
    }
}

/// 登記API・ジオロケーションのURLを差し替えてポータルを起動する
#[allow(dead_code)]
pub async fn spawn_portal(registry_url: &str, geo_base_url: &str) -> TestPortal {
    spawn_portal_with_geo_timeout(registry_url, geo_base_url, Duration::from_millis(1000)).await
}

/// ジオロケーションのタイムアウトも指定してポータルを起動する
pub async fn spawn_portal_with_geo_timeout(
    registry_url: &str,
    geo_base_url: &str,
    geo_timeout: Duration,
) -> TestPortal {
    let db_pool = create_test_db_pool().await;
    let http_client = reqwest::Client::new();

    let registry = RegistryClient::new(
        http_client.clone(),
        RegistryConfig {
            url: registry_url.to_string(),
            identification: "test-identification".to_string(),
            timeout: Duration::from_secs(5),
        },
    );
    let geo = GeoLocator::new(
        http_client.clone(),
        GeoConfig {
            base_url: geo_base_url.to_string(),
            timeout: geo_timeout,
        },
    );
    let search_logs = Arc::new(SearchLogStorage::new(db_pool.clone()));

    let state = AppState {
        db_pool: db_pool.clone(),
        http_client,
        registry,
        geo,
        search_logs: search_logs.clone(),
        session: SessionConfig {
            admin_username: "admin".to_string(),
            cookie_max_age_secs: 8 * 60 * 60,
        },
    };

    let server = spawn_server(api::create_app(state)).await;

    TestPortal {
        server,
        db_pool,
        search_logs,
    }
}

/// 既知パスワードの管理者クレデンシャルを登録する
#[allow(dead_code)]
pub async fn create_test_admin(pool: &SqlitePool, password: &str) {
    let hash = vlookup::auth::password::hash_password(password).expect("hash should succeed");
    vlookup::db::admin_users::create(pool, "admin", &hash)
        .await
        .expect("admin creation should succeed");
}

/// 監査書き込み（fire-and-forget）の完了を待つ
#[allow(dead_code)]
pub async fn wait_for_audit_write() {
    tokio::time::sleep(Duration::from_millis(300)).await;
}

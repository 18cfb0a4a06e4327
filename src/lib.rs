//! Voter Lookup Portal
//!
//! 市民向けの有権者情報検索ポータル。外部登記APIへのプロキシ検索と、
//! 検索ごとの監査ログ記録・管理者向け閲覧画面を提供する。

#![warn(missing_docs)]

/// 共通型定義（エラー・IPユーティリティ）
pub mod common;

/// REST APIハンドラー
pub mod api;

/// リクエストエンリッチメント（デバイス分類・ジオロケーション）
pub mod enrich;

/// 外部登記APIクライアント
pub mod registry;

/// 検索監査レコード
pub mod audit;

/// データベースアクセス
pub mod db;

/// 認証・セッションゲート
pub mod auth;

/// ロギング初期化ユーティリティ
pub mod logging;

/// 設定管理（環境変数ヘルパー）
pub mod config;

/// axumサーバー起動・シャットダウン
pub mod server;

/// アプリケーション状態
///
/// プロセス起動時に一度だけ構築され、全ハンドラーで共有される。
/// DB接続プールはここで明示的に受け渡す（隠れたグローバルは持たない）。
#[derive(Clone)]
pub struct AppState {
    /// データベース接続プール
    pub db_pool: sqlx::SqlitePool,
    /// 共有HTTPクライアント（接続プーリング有効）
    pub http_client: reqwest::Client,
    /// 登記APIクライアント
    pub registry: registry::RegistryClient,
    /// ジオロケーションクライアント
    pub geo: enrich::geo::GeoLocator,
    /// 検索監査ログストレージ
    pub search_logs: std::sync::Arc<db::search_logs::SearchLogStorage>,
    /// セッション設定
    pub session: config::SessionConfig,
}

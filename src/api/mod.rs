//! REST APIハンドラー
//!
//! ルーティングと各ハンドラーモジュール

use crate::auth::middleware::require_admin_session;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// 共通エラーレスポンス型
pub mod error;

/// 検索プロキシAPI
pub mod search;

/// 監査ログ閲覧API
pub mod logs;

/// 認証API（ログイン/ログアウト）
pub mod auth;

/// 静的ページ配信
pub mod pages;

/// アプリケーションのルーターを構築する
///
/// `/admin`と`/api/logs`はセッションゲート配下。
/// それ以外（検索・認証・公開ページ）は誰でもアクセス可能。
pub fn create_app(state: AppState) -> Router {
    let protected = Router::new()
        .route("/admin", get(pages::admin))
        .route("/api/logs", get(logs::list_logs))
        .route_layer(middleware::from_fn(require_admin_session));

    Router::new()
        .route("/", get(pages::index))
        .route("/verify", get(pages::verify))
        .route("/api/search", post(search::search))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

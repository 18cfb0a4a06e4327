//! 静的ページ配信
//!
//! バイナリに埋め込んだアセット（検索フォーム・ログイン・管理画面）を配信する。
//! 画面はJSON APIをfetchする薄いHTMLで、サーバー側レンダリングはしない。

use crate::auth::middleware::is_logged_in;
use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use include_dir::{include_dir, Dir};

static ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// 埋め込みアセットをレスポンスに変換する
fn serve_asset(path: &str) -> Response {
    match ASSETS.get_file(path) {
        Some(file) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                file.contents().to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

/// GET / - 検索フォーム
pub async fn index() -> Response {
    serve_asset("index.html")
}

/// GET /verify - ログイン画面
///
/// ログイン済みなら管理画面へリダイレクト。
pub async fn verify(headers: HeaderMap) -> Response {
    if is_logged_in(&headers) {
        return Redirect::temporary("/admin").into_response();
    }
    serve_asset("verify.html")
}

/// GET /admin - 監査ログ閲覧画面（セッションゲート配下）
pub async fn admin() -> Response {
    serve_asset("admin.html")
}

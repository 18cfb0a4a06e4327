//! 認証API
//!
//! ログイン、ログアウト

use crate::common::error::PortalError;
use crate::AppState;
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// ログインリクエスト
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// パスワード（固定ユーザー名に対する共有クレデンシャル）
    pub password: Option<String>,
}

/// ログイン/ログアウトの結果メッセージ
#[derive(Debug, Serialize)]
pub struct AuthMessage {
    /// 結果メッセージ
    pub message: String,
}

/// POST /api/auth/login - ログイン
///
/// 固定ユーザー名の保存済みクレデンシャルとパスワードを照合し、
/// 一致すればセッションCookieを発行する。
///
/// # Returns
/// * `200 OK` - ログイン成功（Set-Cookie付き）
/// * `400 Bad Request` - パスワード未指定
/// * `401 Unauthorized` - パスワード不一致
/// * `404 Not Found` - 管理者クレデンシャル未作成
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let password = request
        .password
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError(PortalError::Validation("password is required".to_string())))?;

    let user =
        crate::db::admin_users::find_by_username(&state.db_pool, &state.session.admin_username)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find admin user: {}", e);
                AppError(e)
            })?
            .ok_or_else(|| {
                AppError(PortalError::NotFound(
                    "Admin credential not provisioned".to_string(),
                ))
            })?;

    let is_valid =
        crate::auth::password::verify_password(&password, &user.password_hash).map_err(|e| {
            tracing::error!("Failed to verify password: {}", e);
            AppError(e)
        })?;

    if !is_valid {
        return Err(AppError(PortalError::Authentication(
            "Password mismatch".to_string(),
        )));
    }

    let is_secure = is_request_secure(&headers);
    let cookie = crate::auth::build_session_cookie(state.session.cookie_max_age_secs, is_secure);
    let mut response_headers = HeaderMap::new();
    response_headers.append(
        header::SET_COOKIE,
        cookie.parse().map_err(|e| {
            tracing::error!("Failed to build session cookie: {}", e);
            AppError(PortalError::Internal("Failed to build cookie".to_string()))
        })?,
    );

    tracing::info!("Admin login succeeded: {}", user.username);

    Ok((
        StatusCode::OK,
        response_headers,
        Json(AuthMessage {
            message: "Login successful".to_string(),
        }),
    ))
}

/// POST /api/auth/logout - ログアウト
///
/// セッションCookieを削除する。サーバー側には破棄すべき状態はない。
pub async fn logout(headers: HeaderMap) -> impl IntoResponse {
    let is_secure = is_request_secure(&headers);
    let cookie = crate::auth::clear_session_cookie(is_secure);
    let mut response_headers = HeaderMap::new();
    if let Ok(value) = cookie.parse() {
        response_headers.append(header::SET_COOKIE, value);
    }
    (
        StatusCode::OK,
        response_headers,
        Json(AuthMessage {
            message: "Logged out".to_string(),
        }),
    )
}

fn is_request_secure(headers: &HeaderMap) -> bool {
    if let Some(proto) = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
    {
        if proto.eq_ignore_ascii_case("https") {
            return true;
        }
    }
    if let Some(forwarded) = headers
        .get("forwarded")
        .and_then(|value| value.to_str().ok())
    {
        let lowered = forwarded.to_ascii_lowercase();
        if lowered.contains("proto=https") {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_deserialize() {
        let request: LoginRequest = serde_json::from_str(r#"{"password": "secret"}"#).unwrap();
        assert_eq!(request.password.as_deref(), Some("secret"));
    }

    #[test]
    fn test_login_request_missing_password() {
        let request: LoginRequest = serde_json::from_str("{}").unwrap();
        assert!(request.password.is_none());
    }

    #[tokio::test]
    async fn test_logout_returns_ok_and_clears_cookie() {
        let response = logout(HeaderMap::new()).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .expect("logout should set a clearing cookie");
        assert!(set_cookie.contains(crate::auth::ADMIN_SESSION_COOKIE));
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_logout_sets_secure_flag_behind_https() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        let response = logout(headers).await.into_response();
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(set_cookie.contains("Secure"));
    }

    #[test]
    fn is_request_secure_returns_false_for_empty_headers() {
        assert!(!is_request_secure(&HeaderMap::new()));
    }

    #[test]
    fn is_request_secure_x_forwarded_proto_https() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        assert!(is_request_secure(&headers));
    }

    #[test]
    fn is_request_secure_forwarded_complex_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "forwarded",
            "for=192.0.2.60;proto=https;by=203.0.113.43".parse().unwrap(),
        );
        assert!(is_request_secure(&headers));
    }

    #[test]
    fn is_request_secure_plain_http_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "http".parse().unwrap());
        assert!(!is_request_secure(&headers));
    }
}

//! 管理者セッションゲートミドルウェア
//!
//! セッションCookieを持たないリクエストをログイン画面へリダイレクトする。
//! 単一共有クレデンシャルのアクセス制御であり、ユーザー識別は行わない。

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

/// ログイン画面のパス
pub const LOGIN_PATH: &str = "/verify";

/// セッションCookieの値を取り出す
pub(crate) fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for part in cookie_header.split(';') {
        let trimmed = part.trim();
        if let Some(value) =
            trimmed.strip_prefix(&format!("{}=", crate::auth::ADMIN_SESSION_COOKIE))
        {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// ログイン済みセッションか判定する
pub fn is_logged_in(headers: &HeaderMap) -> bool {
    extract_session_cookie(headers).as_deref() == Some(crate::auth::ADMIN_SESSION_VALUE)
}

/// 管理者セッション必須ミドルウェア
///
/// Cookieが無い・値が不正な場合はログイン画面へ307リダイレクト。
pub async fn require_admin_session(request: Request, next: Next) -> Response {
    if !is_logged_in(request.headers()) {
        return Redirect::temporary(LOGIN_PATH).into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extracts_session_cookie_value() {
        let headers = headers_with_cookie("vlookup_admin=true");
        assert_eq!(extract_session_cookie(&headers).as_deref(), Some("true"));
    }

    #[test]
    fn extracts_among_multiple_cookies() {
        let headers = headers_with_cookie("theme=dark; vlookup_admin=true; lang=bn");
        assert_eq!(extract_session_cookie(&headers).as_deref(), Some("true"));
    }

    #[test]
    fn missing_cookie_returns_none() {
        assert!(extract_session_cookie(&HeaderMap::new()).is_none());
    }

    #[test]
    fn empty_cookie_value_returns_none() {
        let headers = headers_with_cookie("vlookup_admin=");
        assert!(extract_session_cookie(&headers).is_none());
    }

    #[test]
    fn logged_in_requires_exact_flag_value() {
        assert!(is_logged_in(&headers_with_cookie("vlookup_admin=true")));
        assert!(!is_logged_in(&headers_with_cookie("vlookup_admin=false")));
        assert!(!is_logged_in(&headers_with_cookie("vlookup_admin=1")));
        assert!(!is_logged_in(&HeaderMap::new()));
    }
}

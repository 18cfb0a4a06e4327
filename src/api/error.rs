//! APIエラーレスポンス型
//!
//! axum用の共通エラーハンドリング。失敗ボディは
//! `{success: false, message, data: {}}` の固定シェイプ。

use crate::common::error::PortalError;
use axum::{response::IntoResponse, Json};
use serde_json::json;

/// Axum用のエラーレスポンス型
#[derive(Debug)]
pub struct AppError(pub PortalError);

impl From<PortalError> for AppError {
    fn from(err: PortalError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Use external_message() to avoid exposing internal details
        // (upstream hostnames, SQL text, etc.). Full error details are
        // logged separately for debugging.
        let status = self.0.status_code();
        let payload = json!({
            "success": false,
            "message": self.0.external_message(),
            "data": {}
        });

        (status, Json(payload)).into_response()
    }
}

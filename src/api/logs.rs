//! 監査ログ閲覧APIハンドラー
//!
//! セッションゲート越しの読み取り専用エンドポイント。

use crate::audit::types::SearchRecord;
use crate::db::search_logs::SortOrder;
use crate::AppState;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::error::AppError;

/// 監査ログ一覧取得のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct LogsQueryParams {
    /// 取得件数上限（デフォルト: 100）
    pub limit: Option<i64>,
    /// ソート方向（"asc" | "desc"、デフォルト: desc）
    pub sort: Option<String>,
}

/// 監査ログ一覧レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct LogsResponse {
    /// 監査レコード一覧
    pub logs: Vec<SearchRecord>,
}

/// デフォルトの取得件数上限
const DEFAULT_LIMIT: i64 = 100;

/// GET /api/logs - 監査ログ一覧取得
pub async fn list_logs(
    State(state): State<AppState>,
    Query(params): Query<LogsQueryParams>,
) -> Result<Json<LogsResponse>, AppError> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).max(0);
    let sort = SortOrder::from_query(params.sort.as_deref());

    let logs = state.search_logs.list(limit, sort).await?;

    Ok(Json(LogsResponse { logs }))
}

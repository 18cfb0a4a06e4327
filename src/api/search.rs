//! 検索プロキシAPIハンドラー
//!
//! 1検索リクエストの流れ:
//! 1. dob/wardのバリデーション（欠落は400、外部呼び出しなし）
//! 2. User-Agent分類とクライアントIP抽出（同期・純粋）
//! 3. 登記API呼び出しと（公開IPのみ）ジオロケーションを並行実行
//! 4. 合流後、監査レコードを別タスクで保存
//! 5. 登記APIのステータス・ボディをそのままクライアントへ返す
//!
//! ジオロケーションと監査書き込みはベストエフォートで、
//! 失敗してもユーザー向けレスポンスには影響しない。

use crate::audit::types::{NetworkInfo, ResultSummary, SearchCriteria, SearchRecord};
use crate::common::error::PortalError;
use crate::common::ip;
use crate::db::search_logs::save_search_record;
use crate::enrich::device;
use crate::registry::RegistryResponse;
use crate::AppState;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::net::SocketAddr;

use super::error::AppError;

/// 検索リクエスト
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    /// 生年月日
    pub dob: Option<String>,
    /// ワード/村名
    pub ward: Option<String>,
}

/// POST /api/search - 有権者検索プロキシ
pub async fn search(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<SearchRequest>,
) -> Result<Response, AppError> {
    let dob = request
        .dob
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError(PortalError::Validation("dob is required".to_string())))?;
    let ward = request
        .ward
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError(PortalError::Validation("ward is required".to_string())))?;

    // 事前データ準備（同期）
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("");
    let device_info = device::classify(user_agent);
    let client_ip = ip::client_ip(&headers, peer);

    // 登記API呼び出しとジオロケーションを並行実行する。
    // プライベートIPはジオロケーション自体を行わない。
    let registry_future = state.registry.search(&dob, &ward);
    let geo_future = async {
        if ip::is_private_ip(&client_ip) {
            None
        } else {
            state.geo.lookup(&client_ip).await
        }
    };
    let (registry_result, geo_result) = futures::join!(registry_future, geo_future);

    let network = match geo_result {
        Some(geo) => NetworkInfo {
            ip: client_ip.clone(),
            city: geo.city,
            region: geo.region,
            country: geo.country,
            isp: geo.isp,
            timezone: geo.timezone,
        },
        None => NetworkInfo::ip_only(client_ip.clone()),
    };
    let criteria = SearchCriteria { dob, ward };

    let upstream = match registry_result {
        Ok(response) => response,
        Err(e) => {
            // 登記API失敗時もエンリッチメント結果は記録する（サマリーなし）
            save_search_record(
                state.search_logs.clone(),
                SearchRecord::new(criteria, device_info, network, None),
            );
            return Err(AppError(e));
        }
    };

    let status = upstream.status();
    let body = upstream.bytes().await.map_err(|e| {
        tracing::error!("Failed to read registry response body: {}", e);
        AppError(PortalError::Upstream(format!(
            "Failed to read registry response: {}",
            e
        )))
    })?;

    save_search_record(
        state.search_logs.clone(),
        SearchRecord::new(criteria, device_info, network, result_summary(&body)),
    );

    // 登記APIのボディとステータスをそのまま返す
    let mut response = Response::new(Body::from(body));
    *response.status_mut() =
        StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::OK);
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    Ok(response)
}

/// 登記APIレスポンスから最初のマッチのサマリーを組み立てる
///
/// パース不能・マッチなし・IsSuccess=falseはすべてNone。
fn result_summary(body: &[u8]) -> Option<ResultSummary> {
    let payload: RegistryResponse = match serde_json::from_slice(body) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::debug!("Registry response is not the expected shape: {}", e);
            return None;
        }
    };

    if !payload.is_success {
        return None;
    }

    let first = payload.data.as_ref()?.data.first()?;
    Some(ResultSummary {
        name: first.name.clone().unwrap_or_default(),
        guardian_name: first.husband_father.clone().unwrap_or_default(),
        serial_no: first.serial.clone().unwrap_or_default(),
    })
}

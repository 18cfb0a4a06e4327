//! IPジオロケーションクライアント
//!
//! ip-api互換サービス（`<base>/json/<ip>`）への問い合わせ。
//! 短いタイムアウト付きのベストエフォート: 失敗・タイムアウトは
//! 警告ログを残して`None`を返すだけで、呼び出し元の応答には影響しない。

use crate::config::GeoConfig;
use serde::{Deserialize, Serialize};

/// ジオロケーション結果（取得できたフィールドのみ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoInfo {
    /// 都市名
    pub city: String,
    /// 地域名
    pub region: String,
    /// 国名
    pub country: String,
    /// ISP名
    pub isp: String,
    /// タイムゾーン
    pub timezone: String,
}

/// ip-api互換レスポンス
#[derive(Debug, Deserialize)]
struct GeoApiResponse {
    status: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(rename = "regionName", default)]
    region_name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    isp: Option<String>,
    #[serde(default)]
    timezone: Option<String>,
}

/// ジオロケーションクライアント
#[derive(Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    config: GeoConfig,
}

impl GeoLocator {
    /// 共有HTTPクライアントと設定からクライアントを作成
    pub fn new(client: reqwest::Client, config: GeoConfig) -> Self {
        Self { client, config }
    }

    /// 公開IPのロケーションを問い合わせる（ベストエフォート）
    ///
    /// タイムアウト・通信エラー・非successステータスはすべて`None`。
    pub async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let url = format!("{}/json/{}", self.config.base_url.trim_end_matches('/'), ip);

        let response = match self
            .client
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Geolocation lookup failed for {}: {}", ip, e);
                return None;
            }
        };

        let payload: GeoApiResponse = match response.json().await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Geolocation response parse failed for {}: {}", ip, e);
                return None;
            }
        };

        if payload.status != "success" {
            tracing::debug!("Geolocation returned status '{}' for {}", payload.status, ip);
            return None;
        }

        Some(GeoInfo {
            city: payload.city.unwrap_or_default(),
            region: payload.region_name.unwrap_or_default(),
            country: payload.country.unwrap_or_default(),
            isp: payload.isp.unwrap_or_default(),
            timezone: payload.timezone.unwrap_or_default(),
        })
    }
}

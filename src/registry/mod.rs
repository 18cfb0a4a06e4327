//! 選挙人名簿登記APIクライアント
//!
//! 外部の登記APIへ検索リクエストを転送し、レスポンスをそのまま返す。
//! ワイヤフォーマットは登記API側のPascalCase命名に従う。

use crate::common::error::PortalError;
use crate::config::RegistryConfig;
use serde::{Deserialize, Serialize};

/// 登記APIへの検索リクエストボディ
#[derive(Debug, Serialize)]
pub struct RegistrySearchRequest<'a> {
    /// 生年月日（入力された文字列のまま）
    #[serde(rename = "DOB")]
    pub dob: &'a str,
    /// ワード/村名
    #[serde(rename = "Ward")]
    pub ward: &'a str,
    /// 共有シークレットトークン
    #[serde(rename = "Identification")]
    pub identification: &'a str,
}

/// 登記APIのレスポンス全体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryResponse {
    /// データ部
    #[serde(rename = "Data")]
    pub data: Option<RegistryData>,
    /// 成功フラグ
    #[serde(rename = "IsSuccess", default)]
    pub is_success: bool,
    /// メッセージ
    #[serde(rename = "Message", default)]
    pub message: String,
}

/// 登記APIのデータ部
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryData {
    /// DataTables互換のdraw値
    #[serde(default)]
    pub draw: i64,
    /// フィルタ後件数
    #[serde(rename = "recordsFiltered", default)]
    pub records_filtered: i64,
    /// 総件数
    #[serde(rename = "recordsTotal", default)]
    pub records_total: i64,
    /// マッチした有権者レコード
    #[serde(default)]
    pub data: Vec<VoterInfo>,
}

/// 有権者レコード（登記APIワイヤフォーマット）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoterInfo {
    /// レコードID
    #[serde(rename = "Id", default)]
    pub id: i64,
    /// 投票所内の通し番号
    #[serde(rename = "Serial", default)]
    pub serial: Option<String>,
    /// 投票所名
    #[serde(rename = "CenterName", default)]
    pub center_name: Option<String>,
    /// 氏名
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    /// 有権者番号
    #[serde(rename = "Voter_No", default)]
    pub voter_no: Option<String>,
    /// 保護者名（夫または父）
    #[serde(rename = "Husband_Father", default)]
    pub husband_father: Option<String>,
    /// 母の名
    #[serde(rename = "Mother", default)]
    pub mother: Option<String>,
    /// 生年月日（ベンガル暦表記）
    #[serde(rename = "DOB_Bangla", default)]
    pub dob_bangla: Option<String>,
    /// 地域名
    #[serde(rename = "AreaName", default)]
    pub area_name: Option<String>,
    /// 職業
    #[serde(rename = "Occupation", default)]
    pub occupation: Option<String>,
    /// 住所
    #[serde(rename = "Address", default)]
    pub address: Option<String>,
}

/// 登記APIクライアント
#[derive(Clone)]
pub struct RegistryClient {
    client: reqwest::Client,
    config: RegistryConfig,
}

impl RegistryClient {
    /// 共有HTTPクライアントと設定からクライアントを作成
    pub fn new(client: reqwest::Client, config: RegistryConfig) -> Self {
        Self { client, config }
    }

    /// 登記APIへ検索リクエストを転送する
    ///
    /// 成功時（2xx）はレスポンスをそのまま返す。接続エラー・非2xxは
    /// `PortalError::Upstream`（詳細はサーバーログのみに残る）。
    pub async fn search(&self, dob: &str, ward: &str) -> Result<reqwest::Response, PortalError> {
        let body = RegistrySearchRequest {
            dob,
            ward,
            identification: &self.config.identification,
        };

        let response = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json")
            .timeout(self.config.timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach voter registry: {}", e);
                PortalError::Upstream(format!("Registry request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Failed to read registry error body: {}", e);
                    String::new()
                }
            };
            tracing::warn!("Voter registry returned {}: {}", status, error_body);
            return Err(PortalError::Upstream(format!(
                "Registry returned {}: {}",
                status, error_body
            )));
        }

        Ok(response)
    }
}

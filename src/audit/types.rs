//! 検索監査レコードの型定義
//!
//! 1検索 = 1レコード。作成後は不変で、このシステムからは削除されない。

use crate::enrich::device::DeviceInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 検索条件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// 生年月日（入力文字列のまま）
    pub dob: String,
    /// ワード/村名
    pub ward: String,
}

/// ネットワーク情報
///
/// `ip`以外はジオロケーション失敗時・プライベートIP時に空のまま。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// クライアントIP（正規化済み）
    pub ip: String,
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

impl NetworkInfo {
    /// ジオロケーション情報なしのネットワーク情報
    pub fn ip_only(ip: String) -> Self {
        Self {
            ip,
            ..Self::default()
        }
    }
}

/// 検索結果サマリー（最初にマッチした有権者）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// 氏名
    pub name: String,
    /// 保護者名（夫または父）
    pub guardian_name: String,
    /// 通し番号
    pub serial_no: String,
}

/// 監査レコード
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    /// レコードID（DB挿入後に設定）
    pub id: Option<i64>,
    /// 検索条件
    pub search_criteria: SearchCriteria,
    /// デバイス分類
    pub device_info: DeviceInfo,
    /// ネットワーク情報
    pub network: NetworkInfo,
    /// 結果サマリー（マッチなし・登記API失敗時はNone）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultSummary>,
    /// 作成日時
    pub created_at: DateTime<Utc>,
    /// 更新日時
    pub updated_at: DateTime<Utc>,
}

impl SearchRecord {
    /// 新しい監査レコードを作成する（タイムスタンプは現在時刻）
    pub fn new(
        criteria: SearchCriteria,
        device_info: DeviceInfo,
        network: NetworkInfo,
        result: Option<ResultSummary>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            search_criteria: criteria,
            device_info,
            network,
            result,
            created_at: now,
            updated_at: now,
        }
    }
}

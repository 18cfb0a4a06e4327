//! 検索監査ログストレージ

use crate::audit::types::{NetworkInfo, ResultSummary, SearchCriteria, SearchRecord};
use crate::common::error::{PortalError, PortalResult};
use crate::enrich::device::DeviceInfo;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;

/// 一覧取得時のソート方向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// 古い順
    Asc,
    /// 新しい順（デフォルト）
    #[default]
    Desc,
}

impl SortOrder {
    /// クエリ文字列から変換（"asc"以外はすべてDesc）
    pub fn from_query(value: Option<&str>) -> Self {
        match value {
            Some("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }

    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// sqlx::FromRow用の行構造体
#[derive(Debug, sqlx::FromRow)]
struct SearchLogRow {
    id: i64,
    dob: String,
    ward: String,
    browser: String,
    os: String,
    device_type: String,
    vendor: String,
    model: String,
    ip: String,
    city: String,
    region: String,
    country: String,
    isp: String,
    timezone: String,
    result_name: Option<String>,
    result_guardian: Option<String>,
    result_serial: Option<String>,
    created_at: String,
    updated_at: String,
}

impl SearchLogRow {
    fn into_record(self) -> SearchRecord {
        let result = match (self.result_name, self.result_guardian, self.result_serial) {
            (Some(name), guardian, serial) => Some(ResultSummary {
                name,
                guardian_name: guardian.unwrap_or_default(),
                serial_no: serial.unwrap_or_default(),
            }),
            _ => None,
        };
        SearchRecord {
            id: Some(self.id),
            search_criteria: SearchCriteria {
                dob: self.dob,
                ward: self.ward,
            },
            device_info: DeviceInfo {
                browser: self.browser,
                os: self.os,
                device_type: self.device_type,
                vendor: self.vendor,
                model: self.model,
            },
            network: NetworkInfo {
                ip: self.ip,
                city: self.city,
                region: self.region,
                country: self.country,
                isp: self.isp,
                timezone: self.timezone,
            },
            result,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        }
    }
}

fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_default()
}

/// 検索監査ログのDB CRUD操作
#[derive(Clone)]
pub struct SearchLogStorage {
    pool: SqlitePool,
}

impl SearchLogStorage {
    /// 接続プールからストレージを作成
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 監査レコードを1件挿入する
    pub async fn insert(&self, record: &SearchRecord) -> PortalResult<i64> {
        let result = sqlx::query(
            "INSERT INTO search_logs (
                dob, ward,
                browser, os, device_type, vendor, model,
                ip, city, region, country, isp, timezone,
                result_name, result_guardian, result_serial,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.search_criteria.dob)
        .bind(&record.search_criteria.ward)
        .bind(&record.device_info.browser)
        .bind(&record.device_info.os)
        .bind(&record.device_info.device_type)
        .bind(&record.device_info.vendor)
        .bind(&record.device_info.model)
        .bind(&record.network.ip)
        .bind(&record.network.city)
        .bind(&record.network.region)
        .bind(&record.network.country)
        .bind(&record.network.isp)
        .bind(&record.network.timezone)
        .bind(record.result.as_ref().map(|r| r.name.clone()))
        .bind(record.result.as_ref().map(|r| r.guardian_name.clone()))
        .bind(record.result.as_ref().map(|r| r.serial_no.clone()))
        .bind(record.created_at.to_rfc3339())
        .bind(record.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| PortalError::Database(format!("Failed to insert search log: {}", e)))?;

        Ok(result.last_insert_rowid())
    }

    /// 作成日時順で監査レコードを一覧する
    pub async fn list(&self, limit: i64, sort: SortOrder) -> PortalResult<Vec<SearchRecord>> {
        let sql = format!(
            "SELECT * FROM search_logs ORDER BY created_at {order}, id {order} LIMIT ?",
            order = sort.as_sql()
        );
        let rows: Vec<SearchLogRow> = sqlx::query_as(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| PortalError::Database(format!("Failed to list search logs: {}", e)))?;

        Ok(rows.into_iter().map(SearchLogRow::into_record).collect())
    }

    /// 総レコード数を返す
    pub async fn count(&self) -> PortalResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM search_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| PortalError::Database(format!("Failed to count search logs: {}", e)))?;
        Ok(row.0)
    }
}

/// 監査レコードを保存する（Fire-and-forget）
///
/// レスポンス返却を遅らせないよう別タスクで書き込む。
/// 失敗はログに残すのみで呼び出し元へは伝播しない。
pub fn save_search_record(storage: Arc<SearchLogStorage>, record: SearchRecord) {
    tokio::spawn(async move {
        if let Err(e) = storage.insert(&record).await {
            tracing::error!("Failed to save search record: {}", e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db_pool;
    use crate::enrich::device::classify;

    fn make_record(ward: &str, result: Option<ResultSummary>) -> SearchRecord {
        SearchRecord::new(
            SearchCriteria {
                dob: "05/12/1995".to_string(),
                ward: ward.to_string(),
            },
            classify("Mozilla/5.0 (Windows NT 10.0) Chrome/120.0 Safari/537.36"),
            NetworkInfo::ip_only("127.0.0.1".to_string()),
            result,
        )
    }

    #[tokio::test]
    async fn insert_and_read_back_round_trips_fields() {
        let pool = test_db_pool().await;
        let storage = SearchLogStorage::new(pool);

        let record = make_record(
            "নরেন্দ্রপুর",
            Some(ResultSummary {
                name: "Rahim Uddin".to_string(),
                guardian_name: "Karim Uddin".to_string(),
                serial_no: "101".to_string(),
            }),
        );
        let id = storage.insert(&record).await.unwrap();
        assert!(id > 0);

        let logs = storage.list(10, SortOrder::Desc).await.unwrap();
        assert_eq!(logs.len(), 1);
        let stored = &logs[0];
        assert_eq!(stored.id, Some(id));
        assert_eq!(stored.search_criteria.ward, "নরেন্দ্রপুর");
        assert_eq!(stored.device_info.browser, "Chrome");
        assert_eq!(stored.device_info.os, "Windows");
        assert_eq!(stored.device_info.device_type, "Desktop");
        assert_eq!(stored.network.ip, "127.0.0.1");
        assert_eq!(stored.network.country, "");
        let result = stored.result.as_ref().unwrap();
        assert_eq!(result.name, "Rahim Uddin");
        assert_eq!(result.guardian_name, "Karim Uddin");
        assert_eq!(result.serial_no, "101");
    }

    #[tokio::test]
    async fn absent_result_stays_absent() {
        let pool = test_db_pool().await;
        let storage = SearchLogStorage::new(pool);

        storage.insert(&make_record("Testpur", None)).await.unwrap();

        let logs = storage.list(10, SortOrder::Desc).await.unwrap();
        assert!(logs[0].result.is_none());
    }

    #[tokio::test]
    async fn list_respects_limit_and_order() {
        let pool = test_db_pool().await;
        let storage = SearchLogStorage::new(pool);

        for i in 0..5 {
            let mut record = make_record(&format!("ward-{}", i), None);
            // created_atを1秒ずつずらして順序を固定する
            record.created_at = Utc::now() + chrono::Duration::seconds(i);
            record.updated_at = record.created_at;
            storage.insert(&record).await.unwrap();
        }

        let desc = storage.list(3, SortOrder::Desc).await.unwrap();
        assert_eq!(desc.len(), 3);
        assert_eq!(desc[0].search_criteria.ward, "ward-4");
        assert_eq!(desc[2].search_criteria.ward, "ward-2");

        let asc = storage.list(3, SortOrder::Asc).await.unwrap();
        assert_eq!(asc[0].search_criteria.ward, "ward-0");
        assert_eq!(asc[2].search_criteria.ward, "ward-2");
    }

    #[tokio::test]
    async fn count_tracks_inserts() {
        let pool = test_db_pool().await;
        let storage = SearchLogStorage::new(pool);
        assert_eq!(storage.count().await.unwrap(), 0);
        storage.insert(&make_record("a", None)).await.unwrap();
        storage.insert(&make_record("b", None)).await.unwrap();
        assert_eq!(storage.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn save_search_record_writes_in_background() {
        let pool = test_db_pool().await;
        let storage = Arc::new(SearchLogStorage::new(pool));

        save_search_record(storage.clone(), make_record("bg-ward", None));

        // フラッシュを待つ
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        assert_eq!(storage.count().await.unwrap(), 1);
    }

    #[test]
    fn sort_order_from_query() {
        assert_eq!(SortOrder::from_query(Some("asc")), SortOrder::Asc);
        assert_eq!(SortOrder::from_query(Some("desc")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(Some("bogus")), SortOrder::Desc);
        assert_eq!(SortOrder::from_query(None), SortOrder::Desc);
    }
}

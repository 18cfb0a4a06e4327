//! 管理者認証情報のCRUD操作
//!
//! 共有シングルクレデンシャル。複数ユーザーモデルは持たない。

use crate::common::error::PortalError;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

/// 管理者ユーザー
#[derive(Debug, Clone)]
pub struct AdminUser {
    /// レコードID
    pub id: i64,
    /// ユーザー名
    pub username: String,
    /// bcryptハッシュ化されたパスワード
    pub password_hash: String,
    /// 作成日時
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct AdminUserRow {
    id: i64,
    username: String,
    password_hash: String,
    created_at: String,
}

/// 管理者ユーザーを作成
///
/// # Arguments
/// * `pool` - データベース接続プール
/// * `username` - ユーザー名
/// * `password_hash` - bcryptハッシュ化されたパスワード
///
/// # Returns
/// * `Ok(AdminUser)` - 作成されたユーザー
/// * `Err(PortalError)` - 作成失敗（ユーザー名重複など）
pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
) -> Result<AdminUser, PortalError> {
    let created_at = Utc::now();

    let result = sqlx::query(
        "INSERT INTO admin_users (username, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(created_at.to_rfc3339())
    .bind(created_at.to_rfc3339())
    .execute(pool)
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            PortalError::Database(format!("Admin user '{}' already exists", username))
        } else {
            PortalError::Database(format!("Failed to create admin user: {}", e))
        }
    })?;

    Ok(AdminUser {
        id: result.last_insert_rowid(),
        username: username.to_string(),
        password_hash: password_hash.to_string(),
        created_at,
    })
}

/// ユーザー名で管理者を検索
pub async fn find_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<AdminUser>, PortalError> {
    let row: Option<AdminUserRow> = sqlx::query_as(
        "SELECT id, username, password_hash, created_at FROM admin_users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| PortalError::Database(format!("Failed to find admin user: {}", e)))?;

    Ok(row.map(|row| AdminUser {
        id: row.id,
        username: row.username,
        password_hash: row.password_hash,
        created_at: DateTime::parse_from_rfc3339(&row.created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_default(),
    }))
}

/// 管理者が1人も存在しないか確認（初回起動判定）
pub async fn is_first_boot(pool: &SqlitePool) -> Result<bool, PortalError> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM admin_users")
        .fetch_one(pool)
        .await
        .map_err(|e| PortalError::Database(format!("Failed to count admin users: {}", e)))?;
    Ok(row.0 == 0)
}

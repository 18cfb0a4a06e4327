//! データベースアクセス層
//!
//! SQLiteベースのデータ永続化

/// データベースマイグレーション
pub mod migrations;

/// 検索監査ログストレージ
pub mod search_logs;

/// 管理者認証情報
pub mod admin_users;

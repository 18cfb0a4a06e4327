//! 初回起動時の管理者クレデンシャル作成
//!
//! 環境変数からパスワードを取得し、未設定の場合はランダム生成して
//! 起動ログに一度だけ出力する。

use crate::auth::password::hash_password;
use crate::common::error::PortalError;
use crate::config::get_env;
use crate::db;

/// 生成パスワードの長さ
const GENERATED_PASSWORD_LEN: usize = 16;

/// ランダムパスワードを生成する
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    (0..GENERATED_PASSWORD_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// 初回起動時の管理者作成処理
///
/// 1. admin_usersにレコードが存在するかチェック
/// 2. 存在しない場合、`VLOOKUP_ADMIN_USERNAME`（デフォルト: admin）と
///    `VLOOKUP_ADMIN_PASSWORD`（未設定ならランダム生成してログ出力）から作成
/// 3. 既に存在する場合はスキップ
pub async fn ensure_admin_exists(pool: &sqlx::SqlitePool) -> Result<(), PortalError> {
    let is_first_boot = db::admin_users::is_first_boot(pool).await?;
    if !is_first_boot {
        tracing::debug!("Admin credential already exists, skipping bootstrap");
        return Ok(());
    }

    tracing::info!("First boot detected, creating admin credential");

    let username = get_env("VLOOKUP_ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string());

    let password = match get_env("VLOOKUP_ADMIN_PASSWORD") {
        Some(p) if !p.is_empty() => p,
        _ => {
            let generated = generate_password();
            // 起動ログにのみ出力される。再設定はVLOOKUP_ADMIN_PASSWORDで。
            tracing::info!(
                "VLOOKUP_ADMIN_PASSWORD not set, generated admin password: {}",
                generated
            );
            generated
        }
    };

    let password_hash = hash_password(&password)?;

    match db::admin_users::create(pool, &username, &password_hash).await {
        Ok(user) => {
            tracing::info!("Created admin credential: username={}", user.username);
            Ok(())
        }
        Err(PortalError::Database(ref e)) if e.contains("already exists") => {
            tracing::warn!("Admin user {} already exists, skipping creation", username);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Failed to create admin credential: {}", e);
            Err(e)
        }
    }
}

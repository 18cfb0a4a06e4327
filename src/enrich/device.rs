//! User-Agent文字列からのデバイス分類
//!
//! 既知の部分文字列によるヒューリスティック分類。完全なUAパーサーではなく、
//! 監査ログ用のベストエフォート値（ミスマッチは"Unknown"に落ちる）。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)mobile|iphone|ipod|android.*mobile").expect("valid regex"));

static TABLET_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ipad|tablet").expect("valid regex"));

/// デバイス分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// ブラウザ名（Edge/Opera/Chrome/Safari/Firefox/Unknown）
    pub browser: String,
    /// OS名（Windows/Android/iOS/macOS/Linux/Unknown）
    pub os: String,
    /// デバイス種別（Mobile/Tablet/Desktop）
    pub device_type: String,
    /// ベンダー名（ヒューリスティックでは常に空）
    pub vendor: String,
    /// モデル名（ヒューリスティックでは常に空）
    pub model: String,
}

/// User-Agent文字列をデバイス情報に分類する
///
/// 判定順序が重要: Edge/OperaはUAに"chrome/"も含むため先に判定し、
/// Safariは"chrome/"を含まない場合のみSafariとする。
pub fn classify(user_agent: &str) -> DeviceInfo {
    let lower = user_agent.to_lowercase();

    let browser = if lower.contains("edg/") {
        "Edge"
    } else if lower.contains("opr/") || lower.contains("opera") {
        "Opera"
    } else if lower.contains("chrome/") {
        "Chrome"
    } else if lower.contains("safari/") && !lower.contains("chrome/") {
        "Safari"
    } else if lower.contains("firefox/") {
        "Firefox"
    } else {
        "Unknown"
    };

    let os = if lower.contains("windows nt") {
        "Windows"
    } else if lower.contains("android") {
        "Android"
    } else if lower.contains("iphone") || lower.contains("ipad") || lower.contains("ipod") {
        "iOS"
    } else if lower.contains("mac os x") {
        "macOS"
    } else if lower.contains("linux") {
        "Linux"
    } else {
        "Unknown"
    };

    let device_type = if MOBILE_PATTERN.is_match(user_agent) {
        "Mobile"
    } else if TABLET_PATTERN.is_match(user_agent) {
        "Tablet"
    } else {
        "Desktop"
    };

    DeviceInfo {
        browser: browser.to_string(),
        os: os.to_string(),
        device_type: device_type.to_string(),
        vendor: String::new(),
        model: String::new(),
    }
}

impl DeviceInfo {
    /// 空のUAに対するデフォルト分類
    pub fn unknown() -> Self {
        classify("")
    }
}

//! クライアントIP抽出・正規化ユーティリティ
//!
//! forwarded系ヘッダーを優先してクライアントIPを決定し、
//! IPv4-mapped IPv6とループバック表記を正規化する。

use axum::http::HeaderMap;
use std::net::{IpAddr, SocketAddr};

/// IPアドレスを正規化する
///
/// IPv4-mapped IPv6（::ffff:x.x.x.x）をIPv4に変換。
/// それ以外はそのまま返す。
pub fn normalize_ip(addr: IpAddr) -> IpAddr {
    match addr {
        IpAddr::V6(v6) => {
            if let Some(v4) = v6.to_ipv4_mapped() {
                IpAddr::V4(v4)
            } else {
                IpAddr::V6(v6)
            }
        }
        v4 => v4,
    }
}

/// IP文字列を正規化する
///
/// パース可能なら`normalize_ip`を適用し、`::1`は`127.0.0.1`に揃える。
/// パース不能な文字列はトリムしてそのまま返す（監査記録用の生値）。
pub fn normalize_ip_str(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<IpAddr>() {
        Ok(addr) => {
            let normalized = normalize_ip(addr);
            if normalized == IpAddr::V6(std::net::Ipv6Addr::LOCALHOST) {
                "127.0.0.1".to_string()
            } else {
                normalized.to_string()
            }
        }
        Err(_) => trimmed.to_string(),
    }
}

/// リクエストヘッダーと接続先アドレスからクライアントIPを決定する
///
/// 優先順位: `x-forwarded-for`の先頭エントリ → `x-real-ip` → 接続元アドレス。
pub fn client_ip(headers: &HeaderMap, peer: SocketAddr) -> String {
    if let Some(xff) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = xff.split(',').next() {
            let trimmed = first.trim();
            if !trimmed.is_empty() {
                return normalize_ip_str(trimmed);
            }
        }
    }

    if let Some(real) = headers
        .get("x-real-ip")
        .and_then(|value| value.to_str().ok())
    {
        let trimmed = real.trim();
        if !trimmed.is_empty() {
            return normalize_ip_str(trimmed);
        }
    }

    normalize_ip_str(&peer.ip().to_string())
}

/// プライベート/ループバックIPか判定する
///
/// 静的プレフィックス判定のみ。ジオロケーション呼び出しの可否にだけ使うため、
/// 厳密なCIDR判定ではなく既知プレフィックスの前方一致で足りる。
pub fn is_private_ip(ip: &str) -> bool {
    ip == "::1"
        || ip == "127.0.0.1"
        || ip == "0.0.0.0"
        || ip.starts_with("10.")
        || ip.starts_with("192.168.")
        || ip.starts_with("172.16.")
        || ip.starts_with("172.17.")
        || ip.starts_with("172.18.")
        || ip.starts_with("172.19.")
        || ip.starts_with("172.2")
}

// リクエストエンリッチメント（ベストエフォート）

/// User-Agentからのデバイス分類ヒューリスティック
pub mod device;

/// IPジオロケーション（短いタイムアウト付き）
pub mod geo;

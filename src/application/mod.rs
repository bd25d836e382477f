//! Use cases and the services they compose

/// ディレクトリ検査とレポート組み立て
pub mod services;
/// 同期とステータス確認のユースケース
pub mod use_cases;

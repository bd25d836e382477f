//! Domain value objects

/// パスの進捗イベント
pub mod progress;
/// originとの比較
pub mod remote_comparison;
/// MRUDCサマリーコード
pub mod summary_code;

//! Domain entities

/// 管理対象リポジトリ定義
pub mod managed_repo;
/// 管理対象リストとクローン・フェッチ
pub mod managed_repo_registry;
/// レポート行
pub mod report_row;
/// 作業コピーのステータス
pub mod repository_status;
/// ファイルシステムレイアウト
pub mod workspace;

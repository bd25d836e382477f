/// 発見・検査・レポート
pub mod status_check;
/// クローンとフェッチのパス
pub mod sync_repositories;

/// 検査結果と管理状態から行を組み立てる
pub mod report_builder;
/// 作業コピーの状態を読み取る
pub mod repository_inspector;

pub use report_builder::ReportBuilder;
pub use repository_inspector::{InspectOptions, InspectionError, RepositoryInspector, StatusInspector};

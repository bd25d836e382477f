use std::path::Path;
use tracing::warn;

use super::repository_inspector::StatusInspector;
use crate::domain::entities::managed_repo_registry::ManagedRepoRegistry;
use crate::domain::entities::report_row::ReportRow;
use crate::domain::entities::workspace::Workspace;
use crate::domain::value_objects::progress::{EntryOutcome, Pass, ProgressObserver};

/// 発見済みディレクトリとレジストリを突き合わせてレポート行を作る
pub struct ReportBuilder<'a> {
    registry: &'a ManagedRepoRegistry,
    inspector: &'a dyn StatusInspector,
}

impl<'a> ReportBuilder<'a> {
    /// 新しいReportBuilderを作成
    pub fn new(registry: &'a ManagedRepoRegistry, inspector: &'a dyn StatusInspector) -> Self {
        Self {
            registry,
            inspector,
        }
    }

    /// 1ディレクトリ分の行を作成
    ///
    /// 検査エラーはその行の「不明」状態として扱い、呼び出し元には伝播しない。
    pub fn build_row(&self, dir_name: &str, path: &Path) -> ReportRow {
        match self.inspector.inspect(path) {
            Ok(snapshot) => {
                ReportRow::from_snapshot(dir_name, self.registry.is_managed(dir_name), snapshot)
            }
            Err(e) => {
                warn!("{}", e);
                ReportRow::failed(dir_name, e)
            }
        }
    }

    /// 全ディレクトリの行を入力順に作成
    ///
    /// 並べ替えは行わない。行数は常に入力のディレクトリ数と一致する。
    pub fn build_report<S: AsRef<str>>(
        &self,
        dir_names: &[S],
        workspace: &Workspace,
        observer: &dyn ProgressObserver,
    ) -> Vec<ReportRow> {
        observer.pass_started(Pass::Build, dir_names.len());

        let rows = dir_names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                observer.entry_started(Pass::Build, name);
                let row = self.build_row(name, &workspace.repo_path(name));
                observer.entry_finished(Pass::Build, name, row_outcome(&row));
                row
            })
            .collect();

        observer.pass_finished(Pass::Build);
        rows
    }
}

/// 行に対応する進捗結果
pub fn row_outcome(row: &ReportRow) -> EntryOutcome {
    if row.is_failed() {
        EntryOutcome::Failed
    } else {
        EntryOutcome::Inspected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::repository_inspector::{
        InspectionError, MockStatusInspector,
    };
    use crate::domain::entities::report_row::ReportValue;
    use crate::domain::entities::repository_status::{
        RepositoryStatusSnapshot, WorkingCopyStatus,
    };
    use crate::domain::value_objects::progress::NoopObserver;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn registry() -> ManagedRepoRegistry {
        ManagedRepoRegistry::from_lines(["alpha,https://example.com/alpha"]).unwrap()
    }

    #[test]
    fn test_rows_follow_input_order_and_isolate_failures() {
        let mut inspector = MockStatusInspector::new();
        inspector.expect_inspect().returning(|path: &Path| {
            match path.file_name().and_then(|n| n.to_str()) {
                Some("broken") => Err(InspectionError::Task {
                    path: path.to_path_buf(),
                    message: "corrupt".to_string(),
                }),
                Some("plain") => Ok(RepositoryStatusSnapshot::NotARepository),
                _ => Ok(RepositoryStatusSnapshot::WorkingCopy(WorkingCopyStatus {
                    is_dirty: true,
                    ..Default::default()
                })),
            }
        });

        let registry = registry();
        let workspace = Workspace::new("/work/tool");
        let builder = ReportBuilder::new(&registry, &inspector);

        let names = ["zulu", "broken", "alpha", "plain"];
        let rows = builder.build_report(&names, &workspace, &NoopObserver);

        let row_names: Vec<&str> = rows.iter().map(|r| r.dir_name.as_str()).collect();
        assert_eq!(row_names, names.to_vec());
        assert_eq!(rows[0].summary.to_string(), "...D-");
        assert_eq!(rows[1].summary.to_string(), "?????");
        assert_eq!(rows[2].summary.to_string(), "M..D-");
        assert_eq!(rows[3].summary.to_string(), ".N...");
        assert_eq!(rows[3].managed(), ReportValue::NotApplicable);
        assert_eq!(rows[1].managed(), ReportValue::Unknown);
        assert_eq!(rows[0].managed(), ReportValue::Value(false));
    }

    #[test]
    fn test_build_row_uses_workspace_path() {
        let mut inspector = MockStatusInspector::new();
        inspector
            .expect_inspect()
            .withf(|path: &Path| path == PathBuf::from("/work/tool/../alpha").as_path())
            .times(1)
            .returning(|_| Ok(RepositoryStatusSnapshot::WorkingCopy(WorkingCopyStatus::default())));

        let registry = registry();
        let builder = ReportBuilder::new(&registry, &inspector);
        let rows = builder.build_report(&["alpha"], &Workspace::new("/work/tool"), &NoopObserver);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].managed(), ReportValue::Value(true));
    }

    #[test]
    fn test_empty_listing() {
        let inspector = MockStatusInspector::new();
        let registry = registry();
        let builder = ReportBuilder::new(&registry, &inspector);
        let rows = builder.build_report::<String>(&[], &Workspace::new("/w"), &NoopObserver);
        assert!(rows.is_empty());
    }
}

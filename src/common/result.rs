use crate::common::error::ManageReposError;
use std::fmt::Display;

/// プロジェクト全体で使用するResult型のエイリアス
///
/// # Examples
///
/// ```
/// use manage_repos::common::result::ManageResult;
///
/// fn parse(input: &str) -> ManageResult<serde_json::Value> {
///     Ok(serde_json::from_str(input)?)
/// }
/// assert!(parse("{").is_err());
/// ```
pub type ManageResult<T> = Result<T, ManageReposError>;

/// 致命的でない失敗をデフォルト値に畳み込むヘルパー
///
/// 畳み込んだエラーは `tracing` の debug レベルで記録する。
pub trait ResultExt<T> {
    /// デフォルト値でエラーを無視
    ///
    /// ```
    /// use manage_repos::common::result::ResultExt;
    ///
    /// let staged: Result<usize, String> = Err("no commits yet".to_string());
    /// assert_eq!(staged.unwrap_or_default_logged("staged count"), 0);
    /// ```
    fn unwrap_or_default_logged(self, context: &str) -> T
    where
        T: Default;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn unwrap_or_default_logged(self, context: &str) -> T
    where
        T: Default,
    {
        match self {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("{} unavailable, using default: {}", context, e);
                T::default()
            }
        }
    }
}

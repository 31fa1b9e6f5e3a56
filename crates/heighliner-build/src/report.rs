//! ビルド失敗の通知先

use crate::error::BuildError;

/// パイプラインが失敗を返す前に呼ばれる
pub trait FailureReporter: Send + Sync {
    fn report(&self, error: &BuildError);
}

/// tracing にエラーとして記録する
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FailureReporter for TracingReporter {
    fn report(&self, error: &BuildError) {
        tracing::error!("Build failed: {}", error);
    }
}

/// GitHub Actions の `::error::` ワークフローコマンドを出力する
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubActionsReporter;

impl GithubActionsReporter {
    pub fn error_command(message: &str) -> String {
        format!("::error::{}", escape_data(message))
    }
}

impl FailureReporter for GithubActionsReporter {
    fn report(&self, error: &BuildError) {
        println!("{}", Self::error_command(&error.to_string()));
    }
}

fn escape_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

use heighliner_build::ExecOptions;
use heighliner_build::builder::{DEFAULT_DOCKER, DEFAULT_HEIGHLINER};
use std::path::PathBuf;

/// 外部ツールの設定
///
/// 優先順位: 明示的な上書き > 環境変数 (HEIGHLINER_BIN, DOCKER_BIN) > デフォルト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub heighliner: String,
    pub docker: String,
    pub working_dir: Option<PathBuf>,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            heighliner: DEFAULT_HEIGHLINER.to_string(),
            docker: DEFAULT_DOCKER.to_string(),
            working_dir: None,
        }
    }
}

impl ToolConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            heighliner: non_empty_var("HEIGHLINER_BIN").unwrap_or(defaults.heighliner),
            docker: non_empty_var("DOCKER_BIN").unwrap_or(defaults.docker),
            working_dir: None,
        }
    }

    pub fn with_overrides(
        mut self,
        heighliner: Option<String>,
        docker: Option<String>,
        working_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(heighliner) = heighliner {
            self.heighliner = heighliner;
        }
        if let Some(docker) = docker {
            self.docker = docker;
        }
        if working_dir.is_some() {
            self.working_dir = working_dir;
        }
        self
    }

    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            cwd: self.working_dir.clone(),
            ..Default::default()
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

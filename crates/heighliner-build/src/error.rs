use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid boolean input '{name}': {value}")]
    InvalidInput { name: String, value: String },

    #[error("A custom chain spec requires the 'chain' input to name the chain")]
    MissingChainName,

    #[error("Failed to serialize chain spec: {0}")]
    SpecSerialize(#[from] serde_yaml::Error),

    #[error("Failed to write chain spec to {path}: {source}")]
    Materialize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read output of {program}: {source}")]
    Capture {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}", exit_label(.code))]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Couldn't find imageid")]
    MissingImageId,

    #[error("Couldn't find tag")]
    MissingTag,

    #[error("Expected docker metadata to include at least one result, got none.")]
    EmptyMetadataResult,

    #[error("Failed to parse docker metadata: {0}")]
    MetadataParse(#[from] serde_json::Error),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}

impl BuildError {
    /// ユーザー向けの分かりやすいエラーメッセージ
    pub fn user_message(&self) -> String {
        match self {
            BuildError::InvalidInput { name, value } => {
                format!(
                    "入力 '{}' の値 '{}' は真偽値として解釈できません\n\
                     \n\
                     true | True | TRUE | false | False | FALSE のいずれかを指定してください。",
                    name, value
                )
            }
            BuildError::MissingChainName => {
                "カスタムチェーン定義には chain 入力が必要です\n\
                 \n\
                 chain にチェーン名を指定してください (chains.yaml の name になります)。"
                    .to_string()
            }
            BuildError::Spawn { program, .. } => {
                format!(
                    "{} を起動できませんでした: {}\n\
                     \n\
                     解決方法:\n\
                     1. {} がインストールされ PATH に含まれているか確認してください\n\
                     2. HEIGHLINER_BIN / DOCKER_BIN で実行ファイルを明示できます",
                    program, self, program
                )
            }
            BuildError::CommandFailed { stderr, .. } => {
                let stderr = stderr.trim();
                if stderr.is_empty() {
                    format!("{}", self)
                } else {
                    format!("{}\n\n{}", self, stderr)
                }
            }
            BuildError::MissingImageId | BuildError::MissingTag => {
                format!(
                    "{}\n\
                     \n\
                     heighliner の出力に 'Successfully built' / 'Successfully tagged' 行が\n\
                     見つかりませんでした。ビルドログを確認してください。",
                    self
                )
            }
            _ => format!("{}", self),
        }
    }

    /// 失敗したプロセスの終了コード
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_message_includes_stderr() {
        let err = BuildError::CommandFailed {
            program: "docker".to_string(),
            code: Some(1),
            stderr: "Error: No such object: abc123\n".to_string(),
        };

        assert_eq!(err.to_string(), "docker exited with exit code 1");
        let message = err.user_message();
        assert!(message.starts_with("docker exited with exit code 1"));
        assert!(message.ends_with("Error: No such object: abc123"));
        assert_eq!(err.exit_code(), Some(1));
    }

    #[test]
    fn test_command_failed_without_code() {
        let err = BuildError::CommandFailed {
            program: "heighliner".to_string(),
            code: None,
            stderr: String::new(),
        };

        assert!(err.to_string().contains("terminated by signal"));
        assert_eq!(err.exit_code(), None);
    }

    #[test]
    fn test_parse_errors_keep_workflow_wording() {
        assert_eq!(BuildError::MissingImageId.to_string(), "Couldn't find imageid");
        assert_eq!(BuildError::MissingTag.to_string(), "Couldn't find tag");
        assert!(BuildError::MissingTag.user_message().contains("Successfully tagged"));
    }
}

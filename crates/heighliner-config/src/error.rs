use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("出力 '{name}' の値に区切り文字 '{delimiter}' が含まれています")]
    DelimiterCollision { name: String, delimiter: String },

    #[error("出力ファイルに書き込めません: {path}\n理由: {source}")]
    OutputWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

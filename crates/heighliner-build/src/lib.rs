//! heighliner によるチェーンイメージのビルド
//!
//! ビルド入力を heighliner の引数に変換し、必要ならカスタムチェーン定義
//! (chains.yaml) を一時ファイルに書き出してからビルドを実行します。
//! 結果のイメージ ID・タグ・ダイジェストはビルドログと docker inspect から解決します。

pub mod args;
pub mod builder;
pub mod error;
pub mod metadata;
pub mod options;
pub mod output;
pub mod process;
pub mod report;
pub mod spec;

pub use args::build_arguments;
pub use builder::{BuildOutput, ImageBuilder};
pub use error::{BuildError, Result};
pub use metadata::ImageMetadata;
pub use options::{BuildOptions, BuildRequest, ChainSpec, InputProvider};
pub use output::{BuildOutputParser, ImageMatch, MatchKind, ParsedBuild, SuccessLineParser};
pub use process::{ExecOptions, ExecOutput, ProcessRunner, TokioProcessRunner};
pub use report::{FailureReporter, GithubActionsReporter, TracingReporter};
pub use spec::{MaterializedSpec, materialize};

//! heighliner-action の設定
//!
//! - ビルド入力の取得元（環境変数 `INPUT_*`、CLI フラグ、その重ね合わせ）
//! - 外部ツールの実行ファイル設定
//! - ビルド結果の CI 出力（`GITHUB_OUTPUT`）

pub mod error;
pub mod inputs;
pub mod outputs;
pub mod tools;

pub use error::*;
pub use inputs::{EnvInputs, LayeredInputs, MapInputs};
pub use outputs::{OutputTarget, OutputWriter, parse_output_file};
pub use tools::ToolConfig;

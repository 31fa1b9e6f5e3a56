//! カスタムチェーン定義の一時ファイル化
//!
//! ChainSpec を chains.yaml 形式（1 要素のリスト）で一時ディレクトリに書き出し、
//! heighliner の `--file` で組み込みのチェーン定義を上書きします。

use crate::error::{BuildError, Result};
use crate::options::{BuildOptions, ChainSpec};
use std::path::PathBuf;
use tempfile::TempDir;

/// heighliner が読むチェーン定義ファイル名
pub const CHAINS_FILE_NAME: &str = "chains.yaml";

/// 書き出したチェーン定義
///
/// ドロップ時に一時ディレクトリごと削除される。ビルドが終わるまで保持すること。
#[derive(Debug)]
pub struct MaterializedSpec {
    dir: TempDir,
}

impl MaterializedSpec {
    pub fn path(&self) -> PathBuf {
        self.dir.path().join(CHAINS_FILE_NAME)
    }

    #[cfg(test)]
    fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }
}

/// chains.yaml の内容を生成
pub fn render_chains_yaml(spec: &ChainSpec) -> Result<String> {
    Ok(serde_yaml::to_string(std::slice::from_ref(spec))?)
}

/// ChainSpec を一時ファイルに書き出し、BuildOptions の chains-spec-file を差し替える
pub fn materialize(spec: &ChainSpec, opts: &mut BuildOptions) -> Result<MaterializedSpec> {
    let yaml = render_chains_yaml(spec)?;

    let dir = tempfile::Builder::new()
        .prefix("heighliner-chains-")
        .tempdir()
        .map_err(|source| BuildError::Materialize {
            path: std::env::temp_dir(),
            source,
        })?;

    let path = dir.path().join(CHAINS_FILE_NAME);
    std::fs::write(&path, yaml).map_err(|source| BuildError::Materialize {
        path: path.clone(),
        source,
    })?;

    tracing::debug!(
        "Wrote chain spec for '{}' to {}",
        spec.name,
        path.display()
    );

    opts.chains_spec_file = Some(path.to_string_lossy().into_owned());

    Ok(MaterializedSpec { dir })
}

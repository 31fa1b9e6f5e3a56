//! docker inspect によるイメージ情報の解決

use crate::error::{BuildError, Result};
use crate::process::{ExecOptions, ProcessRunner};
use serde::{Deserialize, Deserializer};

/// docker inspect の 1 レコード（必要なフィールドのみ）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageMetadata {
    #[serde(rename = "Id")]
    pub id: String,
    /// 未プッシュのイメージでは空（docker によっては null）
    #[serde(rename = "RepoDigests", default, deserialize_with = "null_as_empty")]
    pub repo_digests: Vec<String>,
}

impl ImageMetadata {
    pub fn digest(&self) -> Option<&str> {
        self.repo_digests.first().map(String::as_str)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// docker inspect の出力を解析し、最初のレコードを返す
pub fn parse_inspect_output(json: &str) -> Result<ImageMetadata> {
    let records: Vec<ImageMetadata> = serde_json::from_str(json)?;
    records
        .into_iter()
        .next()
        .ok_or(BuildError::EmptyMetadataResult)
}

/// 短縮 ID を docker inspect で解決
///
/// 戻り値はパース済みのレコードと、inspect の生出力。
pub async fn inspect_image(
    runner: &dyn ProcessRunner,
    docker: &str,
    short_id: &str,
    options: &ExecOptions,
) -> Result<(ImageMetadata, String)> {
    let args = vec!["inspect".to_string(), short_id.to_string()];
    let output = runner.exec(docker, &args, options).await?.check(docker)?;

    let metadata = parse_inspect_output(&output.stdout)?;
    tracing::debug!(
        "Resolved {} to {} (digest: {:?})",
        short_id,
        metadata.id,
        metadata.digest()
    );

    Ok((metadata, output.stdout))
}

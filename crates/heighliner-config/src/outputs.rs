//! ビルド結果を CI の出力として公開する
//!
//! `GITHUB_OUTPUT` が設定されていればそのファイルに追記し、
//! なければ同じ形式で標準出力に書く。

use crate::error::{ConfigError, Result};
use heighliner_build::BuildOutput;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    File(PathBuf),
    Stdout,
}

#[derive(Debug, Clone)]
pub struct OutputWriter {
    target: OutputTarget,
}

impl OutputWriter {
    pub fn new(target: OutputTarget) -> Self {
        Self { target }
    }

    pub fn from_env() -> Self {
        let target = std::env::var("GITHUB_OUTPUT")
            .ok()
            .filter(|path| !path.is_empty())
            .map(|path| OutputTarget::File(PathBuf::from(path)))
            .unwrap_or(OutputTarget::Stdout);
        Self { target }
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// `name<<DELIM` 形式で 1 件書き出す
    pub fn set_output(&self, name: &str, value: &str) -> Result<()> {
        let entry = format_entry(name, value)?;

        match &self.target {
            OutputTarget::File(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| ConfigError::OutputWrite {
                        path: path.display().to_string(),
                        source,
                    })?;
                file.write_all(entry.as_bytes())
                    .map_err(|source| ConfigError::OutputWrite {
                        path: path.display().to_string(),
                        source,
                    })?;
            }
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(entry.as_bytes())?;
            }
        }

        tracing::debug!("Set output {}", name);
        Ok(())
    }

    /// imageid, digest, metadata, tag を書き出す（digest がなければ空文字）
    pub fn write_build_output(&self, output: &BuildOutput) -> Result<()> {
        self.set_output("imageid", &output.imageid)?;
        self.set_output("digest", output.digest.as_deref().unwrap_or(""))?;
        self.set_output("metadata", &output.metadata)?;
        self.set_output("tag", &output.tag)?;
        Ok(())
    }
}

fn format_entry(name: &str, value: &str) -> Result<String> {
    let delimiter = format!("ghadelimiter_{}", uuid::Uuid::new_v4());

    if name.contains(&delimiter) || value.contains(&delimiter) {
        return Err(ConfigError::DelimiterCollision {
            name: name.to_string(),
            delimiter,
        });
    }

    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// 書き出された出力ファイルを名前と値の組に戻す
pub fn parse_output_file(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut lines = content.lines();

    while let Some(line) = lines.next() {
        let Some((name, delimiter)) = line.split_once("<<") else {
            if let Some((name, value)) = line.split_once('=') {
                entries.push((name.to_string(), value.to_string()));
            }
            continue;
        };

        let mut value_lines = Vec::new();
        for value_line in lines.by_ref() {
            if value_line == delimiter {
                break;
            }
            value_lines.push(value_line);
        }
        entries.push((name.to_string(), value_lines.join("\n")));
    }

    entries
}

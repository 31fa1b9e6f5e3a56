//! heighliner のビルドログ解析
//!
//! heighliner は構造化された結果を返さないため、docker のビルドログに含まれる
//! `Successfully built <id>` / `Successfully tagged <tag>` 行から結果を拾う。
//! 形式が変わった場合は `BuildOutputParser` の実装を差し替える。

use crate::error::{BuildError, Result};
use regex::Regex;
use std::sync::LazyLock;

static SUCCESS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Successfully (built|tagged) (\S+)").expect("success line pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Built,
    Tagged,
}

/// ログ中の確認行 1 件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMatch {
    pub kind: MatchKind,
    pub value: String,
}

/// ビルドログから得た識別子
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBuild {
    /// docker inspect に渡す短縮イメージ ID
    pub short_id: String,
    pub tag: String,
}

pub trait BuildOutputParser: Send + Sync {
    fn parse(&self, stdout: &str) -> Result<ParsedBuild>;
}

/// `Successfully built` / `Successfully tagged` 行を拾うパーサ
///
/// 複数ある場合はどちらも最初の行を採用する。
#[derive(Debug, Clone, Copy, Default)]
pub struct SuccessLineParser;

impl SuccessLineParser {
    /// 出現順に全ての確認行を返す
    pub fn matches(stdout: &str) -> Vec<ImageMatch> {
        stdout
            .lines()
            .filter_map(|line| SUCCESS_LINE.captures(line))
            .map(|caps| ImageMatch {
                kind: if &caps[1] == "built" {
                    MatchKind::Built
                } else {
                    MatchKind::Tagged
                },
                value: caps[2].to_string(),
            })
            .collect()
    }
}

impl BuildOutputParser for SuccessLineParser {
    fn parse(&self, stdout: &str) -> Result<ParsedBuild> {
        let matches = Self::matches(stdout);
        tracing::debug!("Build output confirmations: {:?}", matches);

        let first = |kind: MatchKind| matches.iter().find(|m| m.kind == kind);

        let built = first(MatchKind::Built).ok_or(BuildError::MissingImageId)?;
        let built_count = matches
            .iter()
            .filter(|m| m.kind == MatchKind::Built)
            .count();
        if built_count > 1 {
            tracing::warn!(
                "Found {} 'Successfully built' lines, using the first: {}",
                built_count,
                built.value
            );
        }

        let tagged = first(MatchKind::Tagged).ok_or(BuildError::MissingTag)?;

        Ok(ParsedBuild {
            short_id: built.value.clone(),
            tag: tagged.value.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_output() {
        let stdout = "Successfully built abc123\nSuccessfully tagged myorg/myimage:latest\n";
        let parsed = SuccessLineParser.parse(stdout).unwrap();

        assert_eq!(parsed.short_id, "abc123");
        assert_eq!(parsed.tag, "myorg/myimage:latest");
    }

    #[test]
    fn test_parse_ignores_noise_and_picks_first() {
        let stdout = "\
Step 1/12 : FROM golang:1.21-alpine AS build-env
 ---> 4f1a2b3c
Successfully built 1111aaaa
Step 12/12 : ENTRYPOINT [\"gaiad\"]
Successfully built 2222bbbb\r
Successfully tagged ghcr.io/strangelove-ventures/heighliner/gaia:v14.0.0\r
Successfully tagged ghcr.io/strangelove-ventures/heighliner/gaia:latest
Pushing image...
";
        let parsed = SuccessLineParser.parse(stdout).unwrap();

        assert_eq!(parsed.short_id, "1111aaaa");
        assert_eq!(
            parsed.tag,
            "ghcr.io/strangelove-ventures/heighliner/gaia:v14.0.0"
        );
    }

    #[test]
    fn test_matches_preserve_encounter_order() {
        let stdout = "Successfully tagged a:1\nlog Successfully built b\nSuccessfully tagged c:2";
        let matches = SuccessLineParser::matches(stdout);

        assert_eq!(
            matches,
            vec![
                ImageMatch {
                    kind: MatchKind::Tagged,
                    value: "a:1".to_string()
                },
                ImageMatch {
                    kind: MatchKind::Built,
                    value: "b".to_string()
                },
                ImageMatch {
                    kind: MatchKind::Tagged,
                    value: "c:2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_missing_built_line() {
        let err = SuccessLineParser
            .parse("Successfully tagged myorg/myimage:latest\n")
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingImageId));
    }

    #[test]
    fn test_missing_tagged_line() {
        let err = SuccessLineParser
            .parse("Successfully built abc123\n")
            .unwrap_err();
        assert!(matches!(err, BuildError::MissingTag));
    }

    #[test]
    fn test_empty_output_reports_image_id_first() {
        let err = SuccessLineParser.parse("").unwrap_err();
        assert!(matches!(err, BuildError::MissingImageId));
    }
}

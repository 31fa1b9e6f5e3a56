//! ビルドリクエストのモデル
//!
//! CI から渡された入力を `BuildOptions`（heighliner のフラグ）と
//! `ChainSpec`（chains.yaml を上書きするカスタムチェーン定義）に変換します。

use crate::error::{BuildError, Result};
use serde::{Deserialize, Serialize};

/// 文字列値の入力キー（heighliner のフラグに対応）
pub const STRING_KEYS: [&str; 6] = [
    "chain",
    "chains-spec-file",
    "tag",
    "org",
    "registry",
    "platform",
];

/// 真偽値の入力キー（未指定時は false）
pub const BOOLEAN_KEYS: [&str; 2] = ["local", "buildkit"];

/// カスタムチェーン定義の入力キー
pub const CHAIN_SPEC_KEYS: [&str; 9] = [
    "repo-host",
    "github-organization",
    "github-repo",
    "dockerfile",
    "build-env",
    "pre-build",
    "build-target",
    "binaries",
    "libraries",
];

const TRUE_VALUES: [&str; 3] = ["true", "True", "TRUE"];
const FALSE_VALUES: [&str; 3] = ["false", "False", "FALSE"];

/// 名前付き入力の取得元
///
/// `lookup` だけ実装すれば、空文字の扱いと真偽値の解釈は共通の規則になる。
pub trait InputProvider {
    /// 生の入力値（未設定なら None）
    fn lookup(&self, name: &str) -> Option<String>;

    /// 前後の空白を除いた入力値。空文字は未指定として扱う
    fn get_input(&self, name: &str) -> Option<String> {
        self.lookup(name)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    /// 真偽値入力。未指定は false、解釈できない値はエラー
    fn get_boolean_input(&self, name: &str) -> Result<bool> {
        let Some(value) = self.get_input(name) else {
            return Ok(false);
        };

        if TRUE_VALUES.contains(&value.as_str()) {
            Ok(true)
        } else if FALSE_VALUES.contains(&value.as_str()) {
            Ok(false)
        } else {
            Err(BuildError::InvalidInput {
                name: name.to_string(),
                value,
            })
        }
    }
}

/// heighliner build に渡すオプション
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub chain: Option<String>,
    /// カスタムチェーン定義がある場合は一時ファイルのパスで上書きされる
    pub chains_spec_file: Option<String>,
    pub tag: Option<String>,
    pub org: Option<String>,
    pub registry: Option<String>,
    pub platform: Option<String>,
    pub local: bool,
    pub buildkit: bool,
}

impl BuildOptions {
    pub fn from_inputs(inputs: &dyn InputProvider) -> Result<Self> {
        Ok(Self {
            chain: inputs.get_input("chain"),
            chains_spec_file: inputs.get_input("chains-spec-file"),
            tag: inputs.get_input("tag"),
            org: inputs.get_input("org"),
            registry: inputs.get_input("registry"),
            platform: inputs.get_input("platform"),
            local: inputs.get_boolean_input("local")?,
            buildkit: inputs.get_boolean_input("buildkit")?,
        })
    }
}

/// chains.yaml の 1 エントリ
///
/// `binaries` と `libraries` はカンマまたは改行区切り、`build-env` は改行区切りの
/// 入力をリストに展開する。環境変数の値はカンマを含みうる (`BUILD_TAGS=netgo,ledger`)。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ChainSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_host: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_env: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_build: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub binaries: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub libraries: Option<Vec<String>>,
}

impl ChainSpec {
    /// カスタムチェーン定義の入力を収集
    ///
    /// どのキーも指定されていなければ None（heighliner 組み込みのチェーン定義を使う）。
    /// 指定されている場合、name は chain 入力から取る。
    pub fn from_inputs(inputs: &dyn InputProvider) -> Result<Option<Self>> {
        let spec = Self {
            name: String::new(),
            repo_host: inputs.get_input("repo-host"),
            github_organization: inputs.get_input("github-organization"),
            github_repo: inputs.get_input("github-repo"),
            dockerfile: inputs.get_input("dockerfile"),
            build_env: inputs.get_input("build-env").map(|v| split_lines(&v)),
            pre_build: inputs.get_input("pre-build"),
            build_target: inputs.get_input("build-target"),
            binaries: inputs.get_input("binaries").map(|v| split_list(&v)),
            libraries: inputs.get_input("libraries").map(|v| split_list(&v)),
        };

        if spec.is_empty() {
            return Ok(None);
        }

        let name = inputs.get_input("chain").ok_or(BuildError::MissingChainName)?;
        Ok(Some(Self { name, ..spec }))
    }

    /// name 以外のフィールドが一つも設定されていないか
    pub fn is_empty(&self) -> bool {
        self.repo_host.is_none()
            && self.github_organization.is_none()
            && self.github_repo.is_none()
            && self.dockerfile.is_none()
            && self.build_env.is_none()
            && self.pre_build.is_none()
            && self.build_target.is_none()
            && self.binaries.is_none()
            && self.libraries.is_none()
    }
}

fn split_list(value: &str) -> Vec<String> {
    collect_items(value.split([',', '\n']))
}

fn split_lines(value: &str) -> Vec<String> {
    collect_items(value.lines())
}

fn collect_items<'a>(items: impl Iterator<Item = &'a str>) -> Vec<String> {
    items
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

/// 1 回のビルドに必要な入力一式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildRequest {
    pub options: BuildOptions,
    pub spec: Option<ChainSpec>,
}

impl BuildRequest {
    pub fn new(options: BuildOptions) -> Self {
        Self {
            options,
            spec: None,
        }
    }

    pub fn with_spec(mut self, spec: ChainSpec) -> Self {
        self.spec = Some(spec);
        self
    }

    pub fn from_inputs(inputs: &dyn InputProvider) -> Result<Self> {
        Ok(Self {
            options: BuildOptions::from_inputs(inputs)?,
            spec: ChainSpec::from_inputs(inputs)?,
        })
    }
}

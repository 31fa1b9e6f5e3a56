//! 名前付き入力の取得元

use heighliner_build::InputProvider;
use std::collections::HashMap;

/// GitHub Actions の入力規約に従い、環境変数 `INPUT_<NAME>` から読む
///
/// 名前は大文字化し、空白は `_` に置き換える（`chains-spec-file` → `INPUT_CHAINS-SPEC-FILE`）。
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvInputs;

impl EnvInputs {
    pub fn env_name(name: &str) -> String {
        format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
    }
}

impl InputProvider for EnvInputs {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(Self::env_name(name)).ok()
    }
}

/// メモリ上の入力（CLI フラグやテスト用）
#[derive(Debug, Clone, Default)]
pub struct MapInputs {
    values: HashMap<String, String>,
}

impl MapInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// 値があるときだけ設定
    pub fn insert_opt(&mut self, name: impl Into<String>, value: Option<String>) {
        if let Some(value) = value {
            self.insert(name, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut inputs = Self::new();
        for (name, value) in iter {
            inputs.insert(name, value);
        }
        inputs
    }
}

impl InputProvider for MapInputs {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// 複数の取得元を優先順に重ねる
///
/// 先に追加した層が優先。空文字の値は下の層にフォールバックする。
#[derive(Default)]
pub struct LayeredInputs {
    layers: Vec<Box<dyn InputProvider + Send + Sync>>,
}

impl LayeredInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn layer(mut self, provider: impl InputProvider + Send + Sync + 'static) -> Self {
        self.layers.push(Box::new(provider));
        self
    }
}

impl InputProvider for LayeredInputs {
    fn lookup(&self, name: &str) -> Option<String> {
        self.layers.iter().find_map(|layer| layer.get_input(name))
    }
}

use crate::args::build_arguments;
use crate::error::Result;
use crate::metadata::inspect_image;
use crate::options::{BuildRequest, InputProvider};
use crate::output::{BuildOutputParser, SuccessLineParser};
use crate::process::{ExecOptions, ProcessRunner};
use crate::report::FailureReporter;
use crate::spec::materialize;
use serde::Serialize;
use std::sync::Arc;

pub const DEFAULT_HEIGHLINER: &str = "heighliner";
pub const DEFAULT_DOCKER: &str = "docker";

/// ビルド結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildOutput {
    /// docker inspect の Id
    pub imageid: String,
    /// 最初の RepoDigests。未プッシュなら None
    pub digest: Option<String>,
    /// docker inspect の生出力
    pub metadata: String,
    pub tag: String,
}

/// heighliner によるイメージビルドのパイプライン
///
/// (chains.yaml の書き出し) → 引数生成 → heighliner build → ログ解析 →
/// docker inspect → 結果。どの段階の失敗も reporter に通知してから返す。
pub struct ImageBuilder {
    runner: Arc<dyn ProcessRunner>,
    reporter: Arc<dyn FailureReporter>,
    parser: Box<dyn BuildOutputParser>,
    heighliner: String,
    docker: String,
    exec_options: ExecOptions,
}

impl ImageBuilder {
    pub fn new(runner: Arc<dyn ProcessRunner>, reporter: Arc<dyn FailureReporter>) -> Self {
        Self {
            runner,
            reporter,
            parser: Box::new(SuccessLineParser),
            heighliner: DEFAULT_HEIGHLINER.to_string(),
            docker: DEFAULT_DOCKER.to_string(),
            exec_options: ExecOptions::default(),
        }
    }

    pub fn with_programs(mut self, heighliner: impl Into<String>, docker: impl Into<String>) -> Self {
        self.heighliner = heighliner.into();
        self.docker = docker.into();
        self
    }

    pub fn with_parser(mut self, parser: Box<dyn BuildOutputParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_exec_options(mut self, options: ExecOptions) -> Self {
        self.exec_options = options;
        self
    }

    /// 入力からリクエストを組み立ててビルド
    pub async fn build_from_inputs(&self, inputs: &dyn InputProvider) -> Result<BuildOutput> {
        let request = BuildRequest::from_inputs(inputs).inspect_err(|e| self.reporter.report(e))?;
        self.build(request).await
    }

    /// イメージをビルド
    pub async fn build(&self, request: BuildRequest) -> Result<BuildOutput> {
        self.run(request)
            .await
            .inspect_err(|e| self.reporter.report(e))
    }

    async fn run(&self, request: BuildRequest) -> Result<BuildOutput> {
        let BuildRequest { mut options, spec } = request;

        // ビルドと inspect が終わるまで一時ディレクトリを保持する
        let _materialized = match &spec {
            Some(chain_spec) => Some(materialize(chain_spec, &mut options)?),
            None => None,
        };

        let args = build_arguments(&options);
        tracing::info!("Running {} {}", self.heighliner, args.join(" "));

        let output = self
            .runner
            .exec(&self.heighliner, &args, &self.exec_options)
            .await?
            .check(&self.heighliner)?;

        let parsed = self.parser.parse(&output.stdout)?;
        tracing::info!("Built image {} tagged {}", parsed.short_id, parsed.tag);

        let inspect_options = self.exec_options.clone().silent();
        let (metadata, raw) = inspect_image(
            self.runner.as_ref(),
            &self.docker,
            &parsed.short_id,
            &inspect_options,
        )
        .await?;

        Ok(BuildOutput {
            digest: metadata.digest().map(String::from),
            imageid: metadata.id,
            metadata: raw,
            tag: parsed.tag,
        })
    }
}

mod build;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use heighliner_build::BuildError;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "heighliner-action")]
#[command(about = "Build chain images with heighliner and publish their identifiers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// heighliner でイメージをビルド
    ///
    /// 各入力はフラグか環境変数 INPUT_<NAME> で指定する（フラグが優先）
    Build(BuildArgs),
    /// バージョン情報を表示
    Version,
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// ビルドするチェーン名
    #[arg(long)]
    pub chain: Option<String>,
    /// chains.yaml のパス（カスタムチェーン定義があれば上書きされる）
    #[arg(long)]
    pub chains_spec_file: Option<String>,
    /// イメージタグ
    #[arg(long)]
    pub tag: Option<String>,
    /// GitHub organization の上書き
    #[arg(long)]
    pub org: Option<String>,
    /// プッシュ先レジストリ（例: ghcr.io/strangelove-ventures/heighliner）
    #[arg(long)]
    pub registry: Option<String>,
    /// ターゲットプラットフォーム（例: linux/arm64）
    #[arg(long)]
    pub platform: Option<String>,
    /// ローカルのソースからビルド
    #[arg(long)]
    pub local: bool,
    /// buildkit を使用
    #[arg(long)]
    pub buildkit: bool,

    /// カスタムチェーン: ソースのホスト（例: github.com）
    #[arg(long, help_heading = "Custom chain")]
    pub repo_host: Option<String>,
    /// カスタムチェーン: organization
    #[arg(long, help_heading = "Custom chain")]
    pub github_organization: Option<String>,
    /// カスタムチェーン: リポジトリ
    #[arg(long, help_heading = "Custom chain")]
    pub github_repo: Option<String>,
    /// カスタムチェーン: Dockerfile 種別（cosmos, cargo, imported など）
    #[arg(long, help_heading = "Custom chain")]
    pub dockerfile: Option<String>,
    /// カスタムチェーン: ビルド時の環境変数（改行区切り、KEY=VALUE）
    #[arg(long, help_heading = "Custom chain")]
    pub build_env: Option<String>,
    /// カスタムチェーン: ビルド前に実行するコマンド
    #[arg(long, help_heading = "Custom chain")]
    pub pre_build: Option<String>,
    /// カスタムチェーン: ビルドコマンド
    #[arg(long, help_heading = "Custom chain")]
    pub build_target: Option<String>,
    /// カスタムチェーン: イメージに含めるバイナリ（カンマ区切り）
    #[arg(long, help_heading = "Custom chain")]
    pub binaries: Option<String>,
    /// カスタムチェーン: イメージに含めるライブラリ（カンマ区切り）
    #[arg(long, help_heading = "Custom chain")]
    pub libraries: Option<String>,

    /// heighliner の実行ファイル（未指定時は HEIGHLINER_BIN）
    #[arg(long, help_heading = "Tools")]
    pub heighliner_bin: Option<String>,
    /// docker の実行ファイル（inspect に使用、未指定時は DOCKER_BIN）
    #[arg(long, help_heading = "Tools")]
    pub docker_bin: Option<String>,
    /// heighliner を実行するディレクトリ
    #[arg(long, help_heading = "Tools")]
    pub working_dir: Option<PathBuf>,
    /// 結果を JSON で標準出力に書く
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // stdout は heighliner の出力とワークフローコマンドに使うので、ログは stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let result = match cli.command {
        Commands::Version => {
            println!("heighliner-action {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::Build(args) => build::handle_build_command(args).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let message = match e.downcast_ref::<BuildError>() {
                Some(build_error) => build_error.user_message(),
                None => format!("{:#}", e),
            };
            eprintln!("{} {}", "✗".red(), message.red());
            ExitCode::from(failure_status(&e))
        }
    }
}

/// 失敗時の終了ステータス。heighliner/docker が非ゼロで終了した場合はその値を引き継ぐ
fn failure_status(error: &anyhow::Error) -> u8 {
    error
        .downcast_ref::<BuildError>()
        .and_then(BuildError::exit_code)
        .and_then(|code| u8::try_from(code).ok())
        .filter(|code| *code != 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use heighliner_build::options::{BOOLEAN_KEYS, CHAIN_SPEC_KEYS, STRING_KEYS};

    #[test]
    fn test_failure_status_follows_child_exit_code() {
        let failed = anyhow::Error::from(BuildError::CommandFailed {
            program: "heighliner".to_string(),
            code: Some(4),
            stderr: String::new(),
        });
        assert_eq!(failure_status(&failed), 4);

        let signaled = anyhow::Error::from(BuildError::CommandFailed {
            program: "docker".to_string(),
            code: None,
            stderr: String::new(),
        });
        assert_eq!(failure_status(&signaled), 1);

        assert_eq!(failure_status(&anyhow::Error::from(BuildError::MissingTag)), 1);
        assert_eq!(failure_status(&anyhow::anyhow!("output write failed")), 1);
    }

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_input_has_a_flag() {
        let cli = Cli::command();
        let build = cli.find_subcommand("build").unwrap();
        let flags: Vec<&str> = build.get_arguments().filter_map(|a| a.get_long()).collect();

        for key in STRING_KEYS.iter().chain(&BOOLEAN_KEYS).chain(&CHAIN_SPEC_KEYS) {
            assert!(flags.contains(key), "missing flag --{}", key);
        }
    }

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from([
            "heighliner-action",
            "build",
            "--chain",
            "gaia",
            "--local",
            "--github-organization",
            "cosmos",
        ])
        .unwrap();

        let Commands::Build(args) = cli.command else {
            panic!("Expected build command");
        };
        assert_eq!(args.chain.as_deref(), Some("gaia"));
        assert!(args.local);
        assert!(!args.buildkit);
        assert_eq!(args.github_organization.as_deref(), Some("cosmos"));
    }
}

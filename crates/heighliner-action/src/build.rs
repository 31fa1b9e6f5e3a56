use crate::BuildArgs;
use colored::Colorize;
use heighliner_build::{
    BuildOutput, FailureReporter, GithubActionsReporter, ImageBuilder, TokioProcessRunner,
    TracingReporter,
};
use heighliner_config::{EnvInputs, LayeredInputs, MapInputs, OutputWriter, ToolConfig};
use std::sync::Arc;

impl BuildArgs {
    /// CLI フラグを入力として扱う。未指定のフラグは環境変数の層にフォールバックする
    fn to_inputs(&self) -> MapInputs {
        let mut inputs = MapInputs::new();

        inputs.insert_opt("chain", self.chain.clone());
        inputs.insert_opt("chains-spec-file", self.chains_spec_file.clone());
        inputs.insert_opt("tag", self.tag.clone());
        inputs.insert_opt("org", self.org.clone());
        inputs.insert_opt("registry", self.registry.clone());
        inputs.insert_opt("platform", self.platform.clone());
        if self.local {
            inputs.insert("local", "true");
        }
        if self.buildkit {
            inputs.insert("buildkit", "true");
        }

        inputs.insert_opt("repo-host", self.repo_host.clone());
        inputs.insert_opt("github-organization", self.github_organization.clone());
        inputs.insert_opt("github-repo", self.github_repo.clone());
        inputs.insert_opt("dockerfile", self.dockerfile.clone());
        inputs.insert_opt("build-env", self.build_env.clone());
        inputs.insert_opt("pre-build", self.pre_build.clone());
        inputs.insert_opt("build-target", self.build_target.clone());
        inputs.insert_opt("binaries", self.binaries.clone());
        inputs.insert_opt("libraries", self.libraries.clone());

        inputs
    }
}

fn failure_reporter() -> Arc<dyn FailureReporter> {
    if std::env::var("GITHUB_ACTIONS").is_ok_and(|v| v == "true") {
        Arc::new(GithubActionsReporter)
    } else {
        Arc::new(TracingReporter)
    }
}

/// ビルドコマンドを処理
pub async fn handle_build_command(args: BuildArgs) -> anyhow::Result<()> {
    let inputs = LayeredInputs::new().layer(args.to_inputs()).layer(EnvInputs);

    let tools = ToolConfig::from_env().with_overrides(
        args.heighliner_bin.clone(),
        args.docker_bin.clone(),
        args.working_dir.clone(),
    );
    tracing::debug!("Tool config: {:?}", tools);

    let builder = ImageBuilder::new(Arc::new(TokioProcessRunner), failure_reporter())
        .with_programs(tools.heighliner.clone(), tools.docker.clone())
        .with_exec_options(tools.exec_options());

    let output = builder.build_from_inputs(&inputs).await?;

    OutputWriter::from_env().write_build_output(&output)?;

    if args.json {
        println!("{}", serde_json::to_string(&output)?);
    }
    print_summary(&output);

    Ok(())
}

fn print_summary(output: &BuildOutput) {
    eprintln!();
    eprintln!("{} {}", "✓".green(), "イメージをビルドしました".green());
    eprintln!("  tag:     {}", output.tag.cyan());
    eprintln!("  imageid: {}", output.imageid.cyan());
    match &output.digest {
        Some(digest) => eprintln!("  digest:  {}", digest.cyan()),
        None => eprintln!("  digest:  {}", "(未プッシュ)".yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heighliner_build::{BuildRequest, InputProvider};

    #[test]
    fn test_unset_flags_are_not_inputs() {
        let inputs = BuildArgs::default().to_inputs();
        assert!(inputs.is_empty());
    }

    #[test]
    fn test_flags_become_inputs() {
        let args = BuildArgs {
            chain: Some("gaia".to_string()),
            chains_spec_file: Some("./chains.yaml".to_string()),
            buildkit: true,
            github_repo: Some("gaia".to_string()),
            ..Default::default()
        };
        let inputs = args.to_inputs();

        assert_eq!(
            inputs.get_input("chains-spec-file").as_deref(),
            Some("./chains.yaml")
        );
        assert!(inputs.get_boolean_input("buildkit").unwrap());
        assert!(!inputs.get_boolean_input("local").unwrap());

        let request = BuildRequest::from_inputs(&inputs).unwrap();
        assert_eq!(request.options.chain.as_deref(), Some("gaia"));
        assert_eq!(request.spec.unwrap().github_repo.as_deref(), Some("gaia"));
    }
}

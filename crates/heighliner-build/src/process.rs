//! 外部コマンドの実行
//!
//! heighliner と docker inspect を同じ契約で実行する。終了コードは結果に含めて返し、
//! 非ゼロ終了をエラーにするかどうかは呼び出し側が決める。

use crate::error::{BuildError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

/// 実行時の設定
#[derive(Debug, Clone, Default)]
pub struct ExecOptions {
    pub cwd: Option<PathBuf>,
    pub env: HashMap<String, String>,
    /// true の場合、子プロセスの出力をコンソールに流さない
    pub silent: bool,
}

impl ExecOptions {
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

/// 1 回の実行結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    /// シグナルで終了した場合は None
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// 非ゼロ終了を CommandFailed に変換
    pub fn check(self, program: &str) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(BuildError::CommandFailed {
                program: program.to_string(),
                code: self.exit_code,
                stderr: self.stderr,
            })
        }
    }
}

#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn exec(&self, program: &str, args: &[String], options: &ExecOptions)
    -> Result<ExecOutput>;
}

/// tokio::process による実装
///
/// 出力は行単位でコンソールに流しつつ、全体を取り込む。
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioProcessRunner;

#[async_trait]
impl ProcessRunner for TokioProcessRunner {
    async fn exec(
        &self,
        program: &str,
        args: &[String],
        options: &ExecOptions,
    ) -> Result<ExecOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        cmd.envs(&options.env);
        if let Some(cwd) = &options.cwd {
            cmd.current_dir(cwd);
        }
        cmd.stdin(Stdio::null());
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: {} {}", program, args.join(" "));

        let mut child = cmd.spawn().map_err(|source| BuildError::Spawn {
            program: program.to_string(),
            source,
        })?;

        let echo_stdout = (!options.silent).then_some(Echo::Stdout);
        let echo_stderr = (!options.silent).then_some(Echo::Stderr);
        let (stdout, stderr) = tokio::join!(
            capture(child.stdout.take(), echo_stdout),
            capture(child.stderr.take(), echo_stderr),
        );

        let capture_err = |source| BuildError::Capture {
            program: program.to_string(),
            source,
        };
        let stdout = stdout.map_err(capture_err)?;
        let stderr = stderr.map_err(capture_err)?;

        let status = child.wait().await.map_err(capture_err)?;
        tracing::debug!("{} finished with {}", program, status);

        Ok(ExecOutput {
            exit_code: status.code(),
            stdout,
            stderr,
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Echo {
    Stdout,
    Stderr,
}

async fn capture<R>(reader: Option<R>, echo: Option<Echo>) -> std::io::Result<String>
where
    R: AsyncRead + Unpin,
{
    let Some(reader) = reader else {
        return Ok(String::new());
    };

    let mut reader = BufReader::new(reader);
    let mut captured = String::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }

        let text = String::from_utf8_lossy(&line);
        match echo {
            Some(Echo::Stdout) => print!("{}", text),
            Some(Echo::Stderr) => eprint!("{}", text),
            None => {}
        }
        captured.push_str(&text);
    }

    Ok(captured)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_captures_stdout_and_stderr_separately() {
        let output = TokioProcessRunner
            .exec(
                "sh",
                &sh("echo out-line; echo err-line >&2"),
                &ExecOptions::default().silent(),
            )
            .await
            .unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "out-line\n");
        assert_eq!(output.stderr, "err-line\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_part_of_result() {
        let output = TokioProcessRunner
            .exec("sh", &sh("echo partial; exit 3"), &ExecOptions::default().silent())
            .await
            .unwrap();

        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout, "partial\n");

        let err = output.check("sh").unwrap_err();
        assert_eq!(err.exit_code(), Some(3));
    }

    #[tokio::test]
    async fn test_cwd_and_env_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = ExecOptions {
            cwd: Some(dir.path().to_path_buf()),
            silent: true,
            ..Default::default()
        };
        options
            .env
            .insert("HEIGHLINER_TEST_VALUE".to_string(), "42".to_string());

        let output = TokioProcessRunner
            .exec("sh", &sh("pwd; echo $HEIGHLINER_TEST_VALUE"), &options)
            .await
            .unwrap();

        let lines: Vec<&str> = output.stdout.lines().collect();
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(
            std::path::Path::new(lines[0]).canonicalize().unwrap(),
            expected
        );
        assert_eq!(lines[1], "42");
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let err = TokioProcessRunner
            .exec(
                "heighliner-definitely-not-installed",
                &[],
                &ExecOptions::default(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, BuildError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_output_without_trailing_newline() {
        let output = TokioProcessRunner
            .exec("sh", &sh("printf 'no-newline'"), &ExecOptions::default().silent())
            .await
            .unwrap();

        assert_eq!(output.stdout, "no-newline");
    }
}

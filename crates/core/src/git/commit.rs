//! Running `git commit` under a pair identity.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use tokio::process::Command;
use tracing::{debug, info, instrument};

use crate::errors::GitError;
use crate::pairing::CommitIdentity;

/// Runs `git -c user.name=… -c user.email=… commit <args>`.
///
/// Arguments are passed as argv, so nothing needs shell quoting. Standard
/// streams are inherited so git can open an editor.
#[derive(Debug, Clone, Default)]
pub struct GitCommit {
    workdir: Option<PathBuf>,
    binary: Option<PathBuf>,
}

impl GitCommit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run git in `dir` instead of the current directory.
    pub fn in_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.workdir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Use a specific git executable.
    pub fn with_binary<P: AsRef<Path>>(mut self, binary: P) -> Self {
        self.binary = Some(binary.as_ref().to_path_buf());
        self
    }

    /// Commit as `identity`, passing `args` through to `git commit`.
    #[instrument(skip(self, identity, args), fields(email = %identity.email))]
    pub async fn run(
        &self,
        identity: &CommitIdentity,
        args: &[String],
    ) -> Result<ExitStatus, GitError> {
        let binary = self
            .binary
            .clone()
            .unwrap_or_else(|| PathBuf::from("git"));
        let mut cmd = Command::new(&binary);
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        cmd.args(commit_args(&identity.name, &identity.email, args))
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        debug!(passthrough = args.len(), "running git commit");
        let status = cmd.status().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::BinaryNotFound(binary.display().to_string())
            } else {
                GitError::IoError(e)
            }
        })?;

        info!(code = ?status.code(), "git commit finished");
        Ok(status)
    }
}

/// Full argv (after the binary) for a commit as `name <email>`.
pub fn commit_args(name: &str, email: &str, passthrough: &[String]) -> Vec<String> {
    let mut args = vec![
        "-c".to_string(),
        format!("user.name={}", name),
        "-c".to_string(),
        format!("user.email={}", email),
        "commit".to_string(),
    ];
    args.extend(passthrough.iter().cloned());
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_args() {
        let args = commit_args(
            "Aa Bb and Bb Cc",
            "aa@example.com",
            &["-m".to_string(), "fix \"quoted\" thing".to_string()],
        );
        assert_eq!(
            args,
            [
                "-c",
                "user.name=Aa Bb and Bb Cc",
                "-c",
                "user.email=aa@example.com",
                "commit",
                "-m",
                "fix \"quoted\" thing",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_binary() {
        let identity = CommitIdentity {
            name: "Aa Bb".into(),
            email: "aa@example.com".into(),
            credited: crate::pairing::AuthorSpec::parse("ab", "Aa Bb"),
            authors: vec![crate::pairing::AuthorSpec::parse("ab", "Aa Bb")],
        };
        let result = GitCommit::new()
            .with_binary("/nonexistent/git-binary")
            .run(&identity, &[])
            .await;
        assert!(matches!(result, Err(GitError::BinaryNotFound(_))));
    }
}

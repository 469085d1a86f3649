#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;
use wiremock::MockServer;

/// An isolated home for one test: its own session file and data dir.
pub struct Sandbox {
    dir: TempDir,
    api_url: String,
}

impl Sandbox {
    pub fn new(server: &MockServer) -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
            api_url: format!("http://127.0.0.1:{}", server.address().port()),
        }
    }

    pub fn session_file(&self) -> PathBuf {
        self.dir.path().join("session.json")
    }

    pub fn home(&self) -> &Path {
        self.dir.path()
    }

    /// Run the CLI binary against the mock backend.
    ///
    /// The binary blocks, so it runs off the async runtime that serves the
    /// mock.
    pub async fn run(&self, args: &[&str]) -> Output {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_clinic"));
        cmd.args(args);
        cmd.env("CLINIC_API_URL", &self.api_url);
        cmd.env("CLINIC_SESSION_FILE", self.session_file());
        cmd.env("HOME", self.home());
        cmd.env("XDG_DATA_HOME", self.home().join("data"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("CLINIC_PASSWORD");
        cmd.env_remove("CLINIC_LOG");

        tokio::task::spawn_blocking(move || cmd.output().expect("Failed to execute CLI"))
            .await
            .expect("CLI task panicked")
    }

    /// Run the CLI and expect success, returning stdout.
    pub async fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Run the CLI and expect failure, returning stderr.
    pub async fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args).await;
        if output.status.success() {
            panic!("CLI command should have failed: {:?}", args);
        }
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub async fn login(&self) {
        self.run_success(&["login", "--email", "a@b.com", "--password", "x"])
            .await;
    }
}

//! Test support utilities for CLI behavioural coverage.
//!
//! Supplies the harness used to start fake servers, capture CLI output and
//! load golden fixtures so step definitions stay focused on assertions.

mod fake_server;

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use pgpt_config::Config;
use rstest::fixture;

use crate::{AppError, ConfigLoader, IoStreams, run_with_loader};

pub(super) use fake_server::FakeServer;

/// A config loader that returns a fixed configuration for tests.
pub(super) struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    pub(super) fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self, _args: &[OsString]) -> Result<Config, AppError> {
        Ok(self.config.clone())
    }
}

/// Test world holding CLI state, the fake server and captured output.
#[derive(Default)]
pub(super) struct TestWorld {
    pub config: Config,
    pub server: Option<FakeServer>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub exit_code: Option<ExitCode>,
    pub requests: Vec<String>,
}

impl TestWorld {
    pub fn start_server(&mut self, reply: Vec<u8>) -> Result<()> {
        let server = FakeServer::spawn(reply)?;
        self.point_at(server.port());
        self.server = Some(server);
        Ok(())
    }

    /// Points the configuration at a port nothing listens on.
    pub fn configure_unreachable_server(&mut self) -> Result<()> {
        let port = {
            let listener = TcpListener::bind(("127.0.0.1", 0)).context("bind free port")?;
            listener.local_addr().context("free port address")?.port()
        };
        self.point_at(port);
        Ok(())
    }

    pub fn set_token(&mut self, token: &str) {
        self.config.token = Some(token.to_owned());
    }

    fn point_at(&mut self, port: u16) {
        self.config.server_ip = Some(String::from("127.0.0.1"));
        self.config.server_port = Some(port);
    }

    pub fn run(&mut self, command: &str) -> Result<()> {
        self.stdout.clear();
        self.stderr.clear();
        self.requests.clear();
        let args = build_args(command);
        let loader = StaticConfigLoader::new(self.config.clone());
        let mut io = IoStreams::with_terminal_status(&mut self.stdout, &mut self.stderr, false);
        let exit = run_with_loader(args, &mut io, &loader);
        self.exit_code = Some(exit);
        if let Some(server) = self.server.as_mut() {
            self.requests = server.take_requests()?;
        }
        self.server = None;
        Ok(())
    }

    pub fn stdout_text(&self) -> Result<String> {
        decode_utf8(self.stdout.clone(), "stdout")
    }

    pub fn stderr_text(&self) -> Result<String> {
        decode_utf8(self.stderr.clone(), "stderr")
    }

    pub fn assert_exit(&self, expected: ExitCode) -> Result<()> {
        let exit = self.exit_code.context("exit code recorded")?;
        ensure!(
            exit == expected,
            "expected exit code {expected:?}, got {exit:?}; stderr: {}",
            String::from_utf8_lossy(&self.stderr)
        );
        Ok(())
    }

    pub fn assert_golden_request(&self, fixture: &str) -> Result<()> {
        ensure!(
            self.requests.len() == 1,
            "expected single request but found {}",
            self.requests.len()
        );
        let expected = read_fixture(fixture)?;
        let actual = self.requests.first().context("request missing")?;
        ensure!(
            actual == expected.trim(),
            "request mismatch: expected {expected:?}, got {actual:?}"
        );
        Ok(())
    }

    pub fn assert_golden_stdout(&self, fixture: &str) -> Result<()> {
        let expected = read_fixture(fixture)?;
        let stdout = self.stdout_text()?;
        ensure!(
            stdout == expected,
            "stdout mismatch: expected {expected:?}, got {stdout:?}"
        );
        Ok(())
    }

    pub fn assert_no_requests(&self) -> Result<()> {
        ensure!(
            self.requests.is_empty(),
            "expected no requests but found {:?}",
            self.requests
        );
        Ok(())
    }
}

#[fixture]
pub(super) fn world() -> RefCell<TestWorld> {
    RefCell::new(TestWorld::default())
}

pub(super) fn build_args(command: &str) -> Vec<OsString> {
    let mut args = vec![OsString::from("pgpt")];
    args.extend(
        command
            .split_whitespace()
            .map(|token| OsString::from(token.trim_matches('"'))),
    );
    args
}

pub(super) fn read_fixture(name: &str) -> Result<String> {
    let normalized = name.trim().trim_matches('"');
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("golden");
    path.push(normalized);
    fs::read_to_string(&path).with_context(|| format!("read fixture at {}", path.display()))
}

fn decode_utf8(buffer: Vec<u8>, label: &str) -> Result<String> {
    String::from_utf8(buffer).with_context(|| format!("{label} utf8"))
}

//! Command-line interface runtime for the pgpt client.
//!
//! The module owns argument parsing, configuration bootstrapping and the
//! single exchange each invocation performs. The runtime is exercised both
//! from the binary entrypoint and from tests, where configuration loading
//! and IO streams can be substituted.

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use pgpt_client::{Client, ClientError, Envelope, ValidationError};
use thiserror::Error;
use tracing::debug;

mod cli;
mod command;
mod config;
pub mod output;
mod telemetry;

use cli::Cli;
use command::CommandInvocation;
use config::{prepare_cli_arguments, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub use output::{OutputFormat, ResolvedOutputFormat};
use telemetry::TelemetryError;

/// Bundles the IO streams provided to the CLI runtime.
pub(crate) struct IoStreams<'a, W: Write, E: Write> {
    pub(crate) stdout: &'a mut W,
    pub(crate) stderr: &'a mut E,
    stdout_is_terminal: bool,
}

impl<'a, W: Write, E: Write> IoStreams<'a, W, E> {
    pub(crate) fn new(stdout: &'a mut W, stderr: &'a mut E) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal: io::stdout().is_terminal(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_terminal_status(
        stdout: &'a mut W,
        stderr: &'a mut E,
        stdout_is_terminal: bool,
    ) -> Self {
        Self {
            stdout,
            stderr,
            stdout_is_terminal,
        }
    }

    pub(crate) const fn stdout_is_terminal(&self) -> bool {
        self.stdout_is_terminal
    }
}

struct CliRunner<'a, W: Write, E: Write, L: ConfigLoader> {
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
}

impl<'a, W, E, L> CliRunner<'a, W, E, L>
where
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    fn new(io: &'a mut IoStreams<'a, W, E>, loader: &'a L) -> Self {
        Self { io, loader }
    }

    fn run<I>(&mut self, args: I) -> ExitCode
    where
        I: IntoIterator<Item = OsString>,
    {
        let args: Vec<OsString> = args.into_iter().collect();
        match self.execute(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(AppError::CliUsage(error)) if !error.use_stderr() => {
                // Help and version output are successful invocations.
                let _ = write!(self.io.stdout, "{}", error.render());
                ExitCode::SUCCESS
            }
            Err(error) => {
                self.report(&error);
                ExitCode::FAILURE
            }
        }
    }

    fn execute(&mut self, args: &[OsString]) -> Result<(), AppError> {
        let split = split_config_arguments(args);
        let cli = Cli::try_parse_from(prepare_cli_arguments(args, &split))
            .map_err(AppError::CliUsage)?;
        let config = self.loader.load(&split.config_arguments)?;
        telemetry::initialise(&config)?;

        let format = cli.output.resolve(self.io.stdout_is_terminal());
        let invocation = CommandInvocation::from(cli.command);
        let envelope = Envelope::build(invocation.command, config.token(), invocation.arguments)?;
        let client = Client::new(config.server_endpoint()?, config.client_options());
        debug!(command = invocation.command, endpoint = %client.endpoint(), "dispatching");

        let response = client.send(&envelope)?;
        output::write_response(&mut *self.io.stdout, &response, format)
            .map_err(AppError::ForwardResponse)
    }

    fn report(&mut self, error: &AppError) {
        let _ = writeln!(self.io.stderr, "{error}");
        if let AppError::Client(client_error) = error
            && let Some(raw) = client_error.raw_response()
        {
            let _ = writeln!(
                self.io.stderr,
                "server replied: {}",
                String::from_utf8_lossy(raw)
            );
        }
    }
}

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    let mut io = IoStreams::new(stdout, stderr);
    run_with_loader(args, &mut io, &OrthoConfigLoader)
}

/// Runs the CLI with a custom configuration loader.
#[must_use]
pub(crate) fn run_with_loader<'a, I, W, E, L>(
    args: I,
    io: &'a mut IoStreams<'a, W, E>,
    loader: &'a L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    CliRunner::new(io, loader).run(args)
}

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to load configuration: {0}")]
    LoadConfiguration(Arc<ortho_config::OrthoError>),
    #[error("{0}")]
    CliUsage(clap::Error),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("failed to write response: {0}")]
    ForwardResponse(io::Error),
}

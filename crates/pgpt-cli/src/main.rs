//! CLI entrypoint for the pgpt command client.
//!
//! The binary delegates to [`pgpt_cli::run`], which loads configuration,
//! parses the subcommand, performs one exchange with the server and prints
//! the response.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    pgpt_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}

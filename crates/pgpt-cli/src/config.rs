//! Configuration loading helpers for the pgpt CLI.
//!
//! Leading configuration flags are split off and handed to `ortho_config`;
//! everything from the first other token onwards is parsed by clap.

use std::ffi::{OsStr, OsString};

use ortho_config::OrthoConfig;
use pgpt_config::Config;

use crate::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`pgpt_config::Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--server-ip",
    "--server-port",
    "--token",
    "--framing",
    "--chunk-size",
    "--timeout-ms",
    "--log-filter",
    "--log-format",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// Configuration flags must precede the subcommand; later occurrences are
    /// parsed as subcommand arguments and rejected by clap.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

fn process_config_flag(argument: &OsStr) -> FlagAction {
    let argument_text = argument.to_string_lossy();
    if !argument_text.starts_with("--") {
        return FlagAction::Skip;
    }
    let (flag, has_inline_value) = match argument_text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (argument_text.as_ref(), false),
    };
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Skip
    }
}

/// Result of separating configuration flags from the subcommand tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some(program) = args.first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut filtered = vec![program.clone()];
    let mut index = 1usize;
    while let Some(argument) = args.get(index) {
        match process_config_flag(argument) {
            FlagAction::Include { needs_value } => {
                filtered.push(argument.clone());
                index += 1;
                if needs_value && let Some(value) = args.get(index) {
                    filtered.push(value.clone());
                    index += 1;
                }
            }
            FlagAction::Skip => break,
        }
    }

    ConfigArgumentSplit {
        config_arguments: filtered,
        command_start: index,
    }
}

/// Program name followed by the tokens clap should parse.
pub(crate) fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case("--server-port", FlagAction::Include { needs_value: true })]
    #[case("login", FlagAction::Skip)]
    #[case("--output", FlagAction::Skip)]
    fn classifies_flags(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(process_config_flag(OsStr::new(argument)), expected);
    }

    #[test]
    fn leading_config_flags_are_split_off() {
        let args = os_args(&[
            "pgpt",
            "--server-ip",
            "10.0.0.1",
            "--server-port=5000",
            "--output",
            "json",
            "login",
            "--email",
            "a@b.com",
        ]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os_args(&["pgpt", "--server-ip", "10.0.0.1", "--server-port=5000"])
        );
        assert_eq!(
            prepare_cli_arguments(&args, &split),
            os_args(&["pgpt", "--output", "json", "login", "--email", "a@b.com"])
        );
    }

    #[test]
    fn config_flags_after_the_subcommand_stay_with_it() {
        let args = os_args(&["pgpt", "logout", "--token", "abc"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["pgpt"]));
        assert_eq!(split.command_start, 1);
    }

    #[test]
    fn dangling_flag_is_passed_to_the_loader() {
        let args = os_args(&["pgpt", "--token"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, args);
        assert_eq!(prepare_cli_arguments(&args, &split), os_args(&["pgpt"]));
    }

    #[test]
    fn empty_arguments_split_cleanly() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert_eq!(split.command_start, 0);
    }
}

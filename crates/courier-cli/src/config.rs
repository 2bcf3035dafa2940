//! Configuration loading helpers for the courier CLI.
//!
//! The logic here filters CLI arguments destined for `ortho-config` so the
//! loader only receives supported flags while clap parses the remaining
//! command tokens.

use std::ffi::{OsStr, OsString};

use courier_config::{CONFIG_CLI_FLAGS, Config};
use ortho_config::OrthoConfig;

use crate::errors::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration for the CLI.
    ///
    /// Configuration flags must appear before the command. Flags after the
    /// first other token are left for clap.
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

impl OrthoConfigLoader {
    fn process_config_flag(argument: &OsStr) -> FlagAction {
        let argument_text = argument.to_string_lossy();
        if !argument_text.starts_with("--") {
            return FlagAction::Skip;
        }

        let (flag, has_inline_value) = argument_text
            .split_once('=')
            .map_or((&*argument_text, false), |(flag, _)| (flag, true));

        if CONFIG_CLI_FLAGS.contains(&flag) {
            return FlagAction::Include {
                needs_value: !has_inline_value,
            };
        }

        FlagAction::Skip
    }
}

pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut filtered = vec![program.clone()];
    let mut command_start = 1_usize;
    let mut pending_value = false;

    for argument in rest {
        if pending_value {
            pending_value = false;
        } else {
            match OrthoConfigLoader::process_config_flag(argument) {
                FlagAction::Include { needs_value } => pending_value = needs_value,
                FlagAction::Skip => break,
            }
        }
        filtered.push(argument.clone());
        command_start += 1;
    }

    ConfigArgumentSplit {
        config_arguments: filtered,
        command_start,
    }
}

/// Rebuilds the argument list clap sees: the program name and the command.
pub(crate) fn command_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn os_args(args: &[&str]) -> Vec<OsString> {
        args.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case("--log-filter", FlagAction::Include { needs_value: true })]
    #[case("--stream-socket", FlagAction::Include { needs_value: true })]
    #[case("morse", FlagAction::Skip)]
    #[case("--transport", FlagAction::Skip)]
    #[case("--unknown", FlagAction::Skip)]
    fn classifies_flags(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(
            OrthoConfigLoader::process_config_flag(OsStr::new(argument)),
            expected
        );
    }

    #[test]
    fn separates_config_flags_from_command() {
        let args = os_args(&[
            "courier",
            "--stream-socket",
            "tcp://127.0.0.1:9000",
            "--log-filter=debug",
            "--transport",
            "stream",
            "morse",
            "sos",
        ]);
        let split = split_config_arguments(&args);
        assert_eq!(
            split.config_arguments,
            os_args(&[
                "courier",
                "--stream-socket",
                "tcp://127.0.0.1:9000",
                "--log-filter=debug"
            ])
        );
        assert_eq!(
            command_arguments(&args, &split),
            os_args(&["courier", "--transport", "stream", "morse", "sos"])
        );
    }

    #[test]
    fn flags_after_the_command_stay_with_the_command() {
        let args = os_args(&["courier", "morse", "--log-filter", "debug"]);
        let split = split_config_arguments(&args);
        assert_eq!(split.config_arguments, os_args(&["courier"]));
        assert_eq!(split.command_start, 1);
    }

    #[test]
    fn empty_arguments_split_cleanly() {
        let split = split_config_arguments(&[]);
        assert!(split.config_arguments.is_empty());
        assert_eq!(split.command_start, 0);
    }
}

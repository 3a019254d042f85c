// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, io, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use sublime_core::{APP_NAME, Config};
use tracing_subscriber::EnvFilter;

use crate::cmd_drag::CmdDrag;
use crate::cmd_generate_completion::CmdGenerateCompletion;
use crate::cmd_month::CmdMonth;
use crate::cmd_rrule::{CmdRruleCheck, CmdRruleDecode, CmdRruleDescribe, CmdRruleEncode};
use crate::config::parse_config;

const SUBLIME_LOG_ENV: &str = "SUBLIME_LOG";

/// Run the sublime command-line interface.
pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run() {
                println!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => println!("{} {}", "Error:".red(), e),
    };
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(SUBLIME_LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Pick dates, date ranges and recurrence rules from the terminal.")
            .author("Zexin Yuan <aim@yzx9.xyz>")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $SUBLIME_CONFIG, then \
$XDG_CONFIG_HOME/sublime/config.toml on Linux and MacOS, \
%APPDATA%/sublime/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath)
                    .global(true),
            )
            .subcommand(
                Command::new("rrule")
                    .alias("r")
                    .about("Work with recurrence rules")
                    .arg_required_else_help(true)
                    .subcommand_required(true)
                    .subcommand(CmdRruleDecode::command())
                    .subcommand(CmdRruleEncode::command())
                    .subcommand(CmdRruleCheck::command())
                    .subcommand(CmdRruleDescribe::command()),
            )
            .subcommand(CmdMonth::command())
            .subcommand(CmdDrag::command())
            .subcommand(CmdGenerateCompletion::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some(("rrule", matches)) => match matches.subcommand() {
                Some((CmdRruleDecode::NAME, matches)) => RruleDecode(CmdRruleDecode::from(matches)),
                Some((CmdRruleEncode::NAME, matches)) => RruleEncode(CmdRruleEncode::from(matches)),
                Some((CmdRruleCheck::NAME, matches)) => RruleCheck(CmdRruleCheck::from(matches)),
                Some((CmdRruleDescribe::NAME, matches)) => {
                    RruleDescribe(CmdRruleDescribe::from(matches))
                }
                _ => return Err("missing rrule subcommand".into()),
            },
            Some((CmdMonth::NAME, matches)) => Month(CmdMonth::from(matches)),
            Some((CmdDrag::NAME, matches)) => Drag(CmdDrag::from(matches)),
            Some((CmdGenerateCompletion::NAME, matches)) => {
                GenerateCompletion(CmdGenerateCompletion::from(matches))
            }
            _ => return Err("missing subcommand".into()),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config)
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Decode a rule into editor fields
    RruleDecode(CmdRruleDecode),

    /// Encode editor fields into a rule
    RruleEncode(CmdRruleEncode),

    /// Check whether a rule is editable
    RruleCheck(CmdRruleCheck),

    /// Describe a rule
    RruleDescribe(CmdRruleDescribe),

    /// Show a month page
    Month(CmdMonth),

    /// Replay a drag gesture
    Drag(CmdDrag),

    /// Generate shell completion
    GenerateCompletion(CmdGenerateCompletion),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            RruleDecode(a)   => Self::run_with(config, |x| a.run(x)),
            RruleEncode(a)   => Self::run_with(config, |x| a.run(x)),
            RruleCheck(a)    => Self::run_with(config, |x| a.run(x)),
            RruleDescribe(a) => Self::run_with(config, |x| a.run(x)),
            Month(a)         => Self::run_with(config, |x| a.run(x)),
            Drag(a)          => Self::run_with(config, |x| a.run(x)),
            GenerateCompletion(a) => a.run(),
        }
    }

    fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: FnOnce(&Config) -> Result<(), Box<dyn Error>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config)?;
        f(&config)
    }
}

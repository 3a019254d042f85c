// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{env, error::Error, io, path::Path};

use clap::{ArgMatches, Command, ValueEnum, arg, value_parser};
use clap_complete::{Generator, generate};
use sublime_core::APP_NAME;

use crate::Cli;

/// Print a completion script covering every picker subcommand.
#[derive(Debug, Clone)]
pub struct CmdGenerateCompletion {
    pub shell: Shell,
    /// Name the script registers completions for
    pub bin_name: String,
}

impl CmdGenerateCompletion {
    pub const NAME: &str = "generate-completion";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .about("Print a shell completion script for sublime")
            .long_about(
                "\
Print a shell completion script for sublime. Without SHELL the shell is taken \
from $SHELL, falling back to bash. For example: \
sublime generate-completion zsh > ~/.zfunc/_sublime",
            )
            .hide(true)
            .arg(
                arg!(shell: [SHELL] "Shell to write the script for")
                    .value_parser(value_parser!(Shell)),
            )
            .arg(
                arg!(--"bin-name" <NAME> "Complete a renamed or aliased binary")
                    .default_value(APP_NAME),
            )
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let shell = matches
            .get_one("shell")
            .copied()
            .or_else(|| {
                let path = env::var_os("SHELL")?;
                Shell::from_path(Path::new(&path))
            })
            .unwrap_or(Shell::Bash);

        Self {
            shell,
            bin_name: matches
                .get_one::<String>("bin-name")
                .cloned()
                .unwrap_or_else(|| APP_NAME.to_string()),
        }
    }

    pub fn run(self) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "generating shell completion...");
        self.write_to(&mut io::stdout());
        Ok(())
    }

    pub fn write_to(&self, buf: &mut impl io::Write) {
        use clap_complete::Shell as ClapShell;

        match self.shell {
            Shell::Bash => self.write_with(ClapShell::Bash, buf),
            Shell::Elvish => self.write_with(ClapShell::Elvish, buf),
            Shell::Fish => self.write_with(ClapShell::Fish, buf),
            Shell::PowerShell => self.write_with(ClapShell::PowerShell, buf),
            Shell::Zsh => self.write_with(ClapShell::Zsh, buf),
            Shell::Nushell => self.write_with(clap_complete_nushell::Nushell, buf),
        }
    }

    fn write_with(&self, generator: impl Generator, buf: &mut impl io::Write) {
        let mut cmd = Cli::command();
        generate(generator, &mut cmd, self.bin_name.clone(), buf);
    }

    /// The script as text.
    pub fn script(&self) -> String {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Elvish,
    Fish,
    #[clap(alias = "nu")]
    Nushell,
    #[clap(name = "powershell", alias = "pwsh")]
    #[allow(clippy::enum_variant_names)]
    PowerShell,
    Zsh,
}

impl Shell {
    /// Guess the shell from the path of its executable, e.g. `/bin/zsh`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_stem()?.to_str()?;
        Self::from_str(name, true).ok()
    }
}

//! This module defines the command line arguments the binary accepts.

use std::path::PathBuf;
use termcolor::ColorChoice;

use crate::cmd;


#[derive(Debug, clap::Parser)]
#[clap(
    about = "GraphQL gateway and browser for the REST Countries API.",
    disable_help_subcommand = true,
)]
pub(crate) struct Args {
    #[clap(subcommand)]
    pub(crate) cmd: Command,

    /// Whether to use colors and other ANSI codes in output.
    #[clap(long, global = true, value_enum, default_value = "auto")]
    pub(crate) color: ColorArg,
}

#[derive(Debug, clap::Subcommand)]
pub(crate) enum Command {
    /// Starts the GraphQL gateway HTTP server (which also serves the browser
    /// front-end at `/`).
    Serve {
        #[clap(flatten)]
        shared: Shared,
    },

    /// Queries a running gateway and prints all countries, or the details of
    /// one country.
    Browse {
        #[clap(flatten)]
        args: cmd::browse::Args,

        #[clap(flatten)]
        shared: Shared,
    },

    /// Checks the configuration and whether the upstream REST API is reachable.
    ///
    /// Exits with 0 if everything is Ok, and with 1 otherwise.
    Check {
        #[clap(flatten)]
        shared: Shared,
    },

    /// Outputs a template for the configuration file (which includes
    /// descriptions of all options).
    WriteConfig {
        /// Target file. If not specified, the template is written to stdout.
        target: Option<PathBuf>,
    },

    /// Exports the API as GraphQL schema.
    ExportApiSchema {
        #[clap(flatten)]
        args: cmd::export_api_schema::Args,
    },
}

impl Command {
    /// A short name of the command, used to fill `${cmd}` in the log file path.
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Self::Serve { .. } => "serve",
            Self::Browse { .. } => "browse",
            _ => "other",
        }
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct Shared {
    /// Path to the configuration file. If this is not specified, the
    /// `COUNTRY_BROWSER_CONFIG_PATH` environment variable and the default
    /// locations `config.toml` and `/etc/country-browser/config.toml` are
    /// checked. Without any file, built-in defaults are used.
    #[clap(short, long)]
    pub(crate) config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum ColorArg {
    Auto,
    Always,
    Never,
}

impl Args {
    pub(crate) fn stdout_color(&self) -> ColorChoice {
        self.color_choice(std::io::IsTerminal::is_terminal(&std::io::stdout()))
    }

    pub(crate) fn stderr_color(&self) -> ColorChoice {
        self.color_choice(std::io::IsTerminal::is_terminal(&std::io::stderr()))
    }

    fn color_choice(&self, is_terminal: bool) -> ColorChoice {
        match self.color {
            ColorArg::Always => ColorChoice::Always,
            ColorArg::Never => ColorChoice::Never,
            ColorArg::Auto if is_terminal => ColorChoice::Auto,
            ColorArg::Auto => ColorChoice::Never,
        }
    }
}

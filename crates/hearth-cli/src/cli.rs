//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use hearth::DEFAULT_STORAGE_PREFIX;
use tracing::Level;

/// Inspect and change display preferences.
#[derive(Debug, Parser)]
#[command(name = "hearth", version, about)]
pub struct Cli {
    /// Preference file to read and write.
    #[arg(long, global = true, env = "HEARTH_STORE", default_value = "hearth-prefs.json")]
    pub store: PathBuf,

    /// Namespace prefix for the stored keys.
    #[arg(long, global = true, default_value = DEFAULT_STORAGE_PREFIX)]
    pub prefix: String,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Show the active theme and flags.
    Show,
    /// List the available presets.
    List,
    /// Switch to a preset.
    Set {
        /// Preset key, e.g. `classic`.
        key: String,
    },
    /// Flip one of the display flags.
    Toggle {
        #[arg(value_enum)]
        flag: Flag,
    },
    /// Restore the default theme with every flag off.
    Reset,
    /// Print the stylesheet for the active preferences.
    Css,
    /// Print the presets and preferences as a document.
    Export {
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,
    },
    /// Merge presets and preferences from a document.
    Import {
        /// A `.json`, `.yaml` or `.yml` file.
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Flag {
    Dark,
    Contrast,
    Motion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Yaml,
}

impl Cli {
    /// Maximum log level for the requested verbosity.
    pub fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_toggle() {
        let cli = Cli::try_parse_from(["hearth", "toggle", "contrast"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Toggle {
                flag: Flag::Contrast
            }
        );
        assert_eq!(cli.prefix, "baking");
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hearth", "set", "modern", "--store", "/tmp/p.json", "--prefix", "ledger", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.store, PathBuf::from("/tmp/p.json"));
        assert_eq!(cli.prefix, "ledger");
        assert_eq!(cli.log_level(), Level::DEBUG);
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::try_parse_from(["hearth", "export", "--format", "yaml"]).unwrap();
        assert_eq!(
            cli.command,
            Command::Export {
                format: Format::Yaml
            }
        );
    }

    #[test]
    fn test_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["hearth", "toggle", "sparkles"]).is_err());
    }
}

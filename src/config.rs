use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "drsr")]
#[command(about = "GA4GH DRS client")]
pub struct Config {
    /// Bearer token attached to every DRS request
    #[arg(long, env = "DRS_TOKEN", global = true)]
    pub token: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "warn", global = true)]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print object metadata as JSON
    Info { uri: String },

    /// List the names inside a bundle
    Ls { uri: String },

    /// Stream object bytes to stdout
    Cat { uri: String },

    /// Download object bytes to a file
    Dump {
        uri: String,

        /// Output path; defaults to the object's name
        output: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_info_command() {
        let config = Config::try_parse_from(["drsr", "info", "drs://example.org/abc"]).unwrap();
        match config.command {
            Command::Info { uri } => assert_eq!(uri, "drs://example.org/abc"),
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(config.token.is_none());
    }

    #[test]
    fn test_token_flag_is_global() {
        let config =
            Config::try_parse_from(["drsr", "ls", "--token", "sekret", "drs://example.org/abc"])
                .unwrap();
        assert_eq!(config.token.as_deref(), Some("sekret"));
    }

    #[test]
    fn test_dump_output_is_optional() {
        let config = Config::try_parse_from(["drsr", "dump", "drs://example.org/abc"]).unwrap();
        match config.command {
            Command::Dump { output, .. } => assert!(output.is_none()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}

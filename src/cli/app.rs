use super::commands::{ConfigCommands, ProposalsArgs};
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bizctl")]
#[command(about = "Terminal tools for managing proposals and local settings")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse, create and manage proposals in the data API
    Proposals(ProposalsArgs),
    /// Manage local key/value settings
    Settings,
    /// Inspect the configuration file
    Config(ConfigCommands),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_proposals_with_table() {
        let cli = Cli::try_parse_from(["bizctl", "proposals", "--table", "quotations"]).unwrap();
        match cli.command {
            Commands::Proposals(args) => assert_eq!(args.table.as_deref(), Some("quotations")),
            _ => panic!("expected proposals command"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["bizctl"]).is_err());
    }
}

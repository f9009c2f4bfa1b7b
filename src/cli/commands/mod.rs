pub mod config;
pub mod tui;

pub use config::{ConfigCommands, ConfigSubcommands, config_command};
pub use tui::{ProposalsArgs, proposals_command, settings_command};

use anyhow::Result;
use bizctl::config::{Config, ENV_API_TOKEN, ENV_API_URL};
use clap::{Args, Subcommand};
use colored::*;

#[derive(Args)]
pub struct ConfigCommands {
    #[command(subcommand)]
    pub command: ConfigSubcommands,
}

#[derive(Subcommand)]
pub enum ConfigSubcommands {
    /// Show the effective configuration (file plus environment overrides)
    Show,
    /// Print the path of the configuration file
    Path,
}

pub fn config_command(args: ConfigCommands, config: &Config) -> Result<()> {
    match args.command {
        ConfigSubcommands::Show => show(config),
        ConfigSubcommands::Path => {
            println!("{}", Config::get_config_path()?.display());
            Ok(())
        }
    }
}

fn show(config: &Config) -> Result<()> {
    println!();
    println!("  {}", "bizctl configuration".bright_blue().bold());
    println!("  {}", "════════════════════".bright_blue());
    println!("  {}: {}", "File".dimmed(), Config::get_config_path()?.display().to_string().cyan());

    println!();
    println!("  {}", "[api]".bright_white().bold());
    match config.api.base_url.as_deref() {
        Some(url) => println!("    {}: {}", "base_url".dimmed(), url.cyan()),
        None => println!(
            "    {}: {} {}",
            "base_url".dimmed(),
            "not set".bright_yellow(),
            format!("(set it here or via {})", ENV_API_URL).dimmed()
        ),
    }
    println!("    {}: {}", "table".dimmed(), config.api.table.white());
    let token = if config.api.token.is_some() {
        "set".bright_green()
    } else {
        "not set".bright_yellow()
    };
    println!("    {}: {} {}", "token".dimmed(), token, format!("({})", ENV_API_TOKEN).dimmed());
    println!("    {}: {}s", "timeout".dimmed(), config.api.timeout_secs);

    println!();
    println!("  {}", "[tui]".bright_white().bold());
    println!("    {}: {}", "theme".dimmed(), config.tui.theme.white());
    println!("    {}: {}ms", "tick".dimmed(), config.tui.tick_ms);

    println!();
    println!("  {}", "[keys]".bright_white().bold());
    println!("    {}: {}", "quit".dimmed(), config.keys.quit.white());
    println!("    {}: {}", "next_section".dimmed(), config.keys.next_section.white());
    println!("    {}: {}", "prev_section".dimmed(), config.keys.prev_section.white());

    if let Err(e) = config.keymap().and(config.theme()) {
        println!();
        println!("  {} {:#}", "✗".bright_red(), e);
    }
    println!();
    Ok(())
}

use anyhow::{Context, Result, bail};
use bizctl::api::{ItemService, RestItemService, SettingsStore};
use bizctl::config::Config;
use bizctl::tui::apps::{ItemManager, manager};
use bizctl::tui::{Runtime, task};
use clap::Args;
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use is_terminal::IsTerminal;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;

#[derive(Args)]
pub struct ProposalsArgs {
    /// Table (resource) to manage instead of the configured one
    #[arg(long)]
    pub table: Option<String>,
}

pub async fn proposals_command(args: ProposalsArgs, mut config: Config) -> Result<()> {
    if let Some(table) = args.table {
        config.api.table = table;
    }
    let service = RestItemService::new(
        config.base_url()?,
        config.api.table.clone(),
        config.api.token.clone(),
        config.timeout(),
    )?;
    launch(Arc::new(service), &config).await
}

pub async fn settings_command(config: Config) -> Result<()> {
    let store = SettingsStore::new(Config::settings_path()?);
    launch(Arc::new(store), &config).await
}

async fn launch(service: Arc<dyn ItemService>, config: &Config) -> Result<()> {
    // Resolve everything that can fail before touching the terminal
    let keys = config.keymap()?;
    let theme = config.theme()?;
    if !io::stdout().is_terminal() {
        bail!("bizctl needs an interactive terminal (stdout is not a TTY)");
    }

    let state = manager::State::new(service, keys);
    let mut runtime = Runtime::<ItemManager>::new(state, keys, theme, config.tick());

    install_panic_hook();
    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            let _ = restore_terminal();
            return Err(e);
        }
    };

    let result = runtime.run(&mut terminal).await;

    restore_terminal()?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to initialise terminal")
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, cursor::Show)?;
    Ok(())
}

/// Restore the terminal before the default hook prints the panic, so the
/// message is readable and the shell is usable afterwards.
///
/// Panics inside a background task are caught and reported in the status
/// line while the loop keeps running, so those only get logged.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Some(label) = task::current_task() {
            log::error!("Task '{}' panicked: {}", label, panic_info);
            return;
        }
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
        default_hook(panic_info);
    }));
}

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, info};

use yb_backup_tui::app::App;
use yb_backup_tui::client::{DryRunClient, PlatformClient, PlatformClientTrait};
use yb_backup_tui::config::Settings;
use yb_backup_tui::logging::init_logging;
use yb_backup_tui::ui::run_app;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::parse()?;
    let _log_guard = init_logging(&settings.log_file, &settings.log_level)?;
    info!(
        universe = %settings.universe_uuid,
        scheduled = settings.is_scheduled,
        dry_run = settings.dry_run,
        "Starting backup form"
    );

    run_tui_app(settings).await?;

    Ok(())
}

fn build_app(settings: &Settings) -> App {
    let platform = PlatformClient::new(
        &settings.platform_url,
        &settings.customer_uuid,
        &settings.api_token,
    );
    let client: Box<dyn PlatformClientTrait> = if settings.dry_run {
        Box::new(DryRunClient::new(Box::new(platform)))
    } else {
        Box::new(platform)
    };

    let app = App::new(client, &settings.universe_uuid, settings.is_scheduled)
        .with_dry_run(settings.dry_run);
    match &settings.table_uuid {
        Some(table_uuid) => app.with_locked_table(table_uuid),
        None => app,
    }
}

async fn run_tui_app(settings: Settings) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = build_app(&settings);
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Backup form exited with error: {err:#}");
        println!("{err:?}");
    }

    Ok(())
}

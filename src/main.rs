use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trellis::app::{App, Popup};
use trellis::config::AppConfig;
use trellis::theme::Theme;
use trellis::ui;
use trellis::util::strings::{clean_suggestion, dirty_suggestion};
use trellis::widgets::date_picker::DatePicker;

#[derive(Parser, Debug)]
#[command(name = "trellis")]
#[command(version)]
#[command(about = "Terminal gallery for date, time, number and autocomplete widgets")]
struct Args {
    /// Print the month grid for YYYY-MM (current month when omitted)
    #[arg(long, value_name = "YYYY-MM", num_args = 0..=1, default_missing_value = "")]
    calendar: Option<String>,

    /// Print --calendar output as JSON
    #[arg(long, requires = "calendar")]
    json: bool,

    /// First day of the week, 0 = Sunday .. 6 = Saturday
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=6))]
    week_start: Option<u8>,

    /// Escape text the way accepted suggestions are stored
    #[arg(long, value_name = "TEXT")]
    clean: Option<String>,

    /// Decode escaped suggestion text
    #[arg(long, value_name = "TEXT")]
    dirty: Option<String>,

    /// Config file (default: <config dir>/trellis/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.log_file.as_deref())?;

    // Handle CLI-only commands
    if let Some(text) = &args.clean {
        println!("{}", clean_suggestion(text));
        return Ok(());
    }

    if let Some(text) = &args.dirty {
        println!("{}", dirty_suggestion(text));
        return Ok(());
    }

    let mut config = AppConfig::load_from(args.config.as_deref())?;
    if let Some(day) = args.week_start {
        config.date_picker.week_start_day = Some(day);
    }

    if let Some(month) = &args.calendar {
        return print_calendar(&config, month, args.json);
    }

    let theme_dir = match &args.config {
        Some(path) => path.parent().map(PathBuf::from),
        None => AppConfig::config_dir().ok(),
    };
    ui::init_theme(Theme::load(theme_dir.as_deref()));

    // Run TUI
    run_tui(config).await
}

fn init_logging(log_file: Option<&std::path::Path>) -> Result<()> {
    let file_layer = match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };
    let stderr_layer = file_layer
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(io::stderr));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    Ok(())
}

fn print_calendar(config: &AppConfig, month: &str, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let view = if month.is_empty() {
        today
    } else {
        NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
            .with_context(|| format!("Invalid month {:?}, expected YYYY-MM", month))?
    };

    // The picker supplies the configured locale and week start
    let mut picker = DatePicker::from_config(&config.date_picker, today);
    picker.set_view_date(view);
    let grid = picker.grid();

    if json {
        println!("{}", serde_json::to_string_pretty(grid)?);
        return Ok(());
    }

    println!("{}", grid.to_text(&picker.day_names()));
    Ok(())
}

async fn run_tui(config: AppConfig) -> Result<()> {
    // Create app state before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') if app.popup == Popup::None && !app.is_typing() => {
                        return Ok(())
                    }
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {
                        if let Err(e) = app.handle_key(key) {
                            tracing::warn!("Key handling failed: {:#}", e);
                        }
                    }
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Debounce timers, query results, animations
        app.tick()?;

        // Let spawned query tasks make progress between frames
        tokio::task::yield_now().await;
    }
}

mod app;
mod config;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use theme::Theme;

#[derive(Parser, Debug)]
#[command(name = "propdrill")]
#[command(version = "0.1.0")]
#[command(about = "A counter whose state lives four components above its button")]
struct Args {
    /// Starting count (overrides initial_count from the config file)
    #[arg(short, long, allow_negative_numbers = true)]
    count: Option<i64>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the component tree as JSON and exit
    #[arg(short, long)]
    render: bool,

    /// With --render, print a text snapshot instead of JSON
    #[arg(short, long, requires = "render")]
    text: bool,

    /// Width of the --text snapshot
    #[arg(short, long, default_value_t = 60, requires = "text")]
    width: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging (stderr, so it stays out of --render output)
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => AppConfig::default_path()?,
    };
    let config = AppConfig::load_from(&config_path)?;

    let theme = Theme::with_border(&config.border_color).unwrap_or_else(|e| {
        tracing::warn!("{}; using the default border", e);
        Theme::default()
    });
    ui::init_theme(theme);

    let count = args.count.unwrap_or(config.initial_count);

    if args.render {
        return print_render(count, args.text, args.width);
    }

    tracing::info!("Starting propdrill at count {}", count);
    run_tui(App::new(count), config.mouse).await
}

fn print_render(count: i64, text: bool, width: u16) -> Result<()> {
    let app = App::new(count);
    let tree = app.view();

    if text {
        for line in ui::render_text(&tree, width) {
            println!("{}", line);
        }
    } else {
        println!("{}", serde_json::to_string_pretty(&tree.describe())?);
    }
    Ok(())
}

async fn run_tui(mut app: App, mouse: bool) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    terminal.show_cursor()?;

    tracing::info!("Exiting at count {}", app.count);
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        let mut buttons = Vec::new();
        terminal.draw(|f| buttons = ui::draw(f, app))?;
        app.set_buttons(buttons);

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                        return Ok(())
                    }
                    _ => {
                        // Handle key and catch any errors to prevent crashes
                        if let Err(e) = app.handle_key(key) {
                            app.set_status(format!("Error: {}", e));
                        }
                    }
                },
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }

        // Apply increments dispatched by the great-grandchild
        app.tick();
    }
}

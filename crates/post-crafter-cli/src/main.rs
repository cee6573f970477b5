use anyhow::Result;
use crossterm::{
    event::{self, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use post_crafter_config::Config;
use post_crafter_engine::Catalog;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::Duration,
};

mod app;
mod ui;

use app::App;

const TICK: Duration = Duration::from_millis(100);

fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    // RUST_LOG still wins over the default level
    builder.parse_default_env();

    match &config.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // The terminal UI owns stderr
        None if env::var_os("RUST_LOG").is_none() => {
            builder.filter_level(log::LevelFilter::Off);
        }
        None => {}
    }

    builder.try_init()?;
    Ok(())
}

fn load_config(args: &[String]) -> Config {
    match args {
        [_] => match Config::load_or_init(Config::config_path()) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                process::exit(1);
            }
        },
        [_, flag, path] if flag == "--config" => {
            let config_path = PathBuf::from(path);
            match Config::load_from_path(&config_path) {
                Ok(Some(config)) => config,
                Ok(None) => {
                    eprintln!("Error: Config file '{}' not found", config_path.display());
                    process::exit(1);
                }
                Err(e) => {
                    eprintln!("Error: Failed to load config file: {e}");
                    process::exit(1);
                }
            }
        }
        _ => {
            eprintln!("Usage: post-crafter-cli [--config <config-file>]");
            process::exit(1);
        }
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = load_config(&args);

    if let Err(e) = init_logging(&config) {
        eprintln!("Error: Failed to set up logging: {e}");
        process::exit(1);
    }
    log::info!("post-crafter starting up");

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::load_from_path(path),
        None => Catalog::builtin(),
    };
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(catalog, &config);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        log::error!("{err:?}");
        println!("{err:?}");
    }

    if !app.copied.is_empty() {
        println!("{}", app.copied.join("\n\n---\n\n"));
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)?
            && let event::Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
        app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

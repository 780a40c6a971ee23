use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use w3atlas::constants::TICK_INTERVAL_MS;
use w3atlas::input::{handle_key, handle_mouse, InputResult, UiState};
use w3atlas::logging::{self, LogBuffer};
use w3atlas::map::{FsMapSource, MapLoader, MapSource};
use w3atlas::planner::{RoutePlanner, RouteSummaryLogger};
use w3atlas::settings::Settings;
use w3atlas::ui::draw_ui;

struct Args {
    map_name: Option<String>,
    maps_dir: Option<PathBuf>,
}

fn print_help() {
    println!("W3Atlas - creep route planner\n");
    println!("Usage: w3atlas [options] [MAP NAME]\n");
    println!("Options:");
    println!("  --maps-dir <DIR>  Read map JSON files from DIR");
    println!("  --version         Show version information");
    println!("  --help            Show this help message");
}

fn parse_args() -> Args {
    let mut args = Args {
        map_name: None,
        maps_dir: None,
    };
    let mut words = Vec::new();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--version" | "-v" => {
                println!("w3atlas {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            "--maps-dir" => match iter.next() {
                Some(dir) => args.maps_dir = Some(PathBuf::from(dir)),
                None => {
                    eprintln!("--maps-dir needs a directory");
                    std::process::exit(1);
                }
            },
            other if other.starts_with('-') => {
                eprintln!("Unknown option: {}", other);
                eprintln!("Run 'w3atlas --help' for usage.");
                std::process::exit(1);
            }
            word => words.push(word.to_string()),
        }
    }

    if !words.is_empty() {
        args.map_name = Some(words.join(" "));
    }
    args
}

fn main() -> io::Result<()> {
    let args = parse_args();

    let (mut settings, settings_error) = match Settings::load() {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };
    if let Some(dir) = args.maps_dir {
        settings.maps_dir = dir;
    }

    let log_receiver = logging::init(&settings.log_filter);
    let mut logs = LogBuffer::new();
    if let Some(e) = settings_error {
        warn!(error = %e, "using default settings");
    }

    let source: Arc<dyn MapSource> = Arc::new(FsMapSource::new(&settings.maps_dir));
    let loader = MapLoader::new(Arc::clone(&source));
    info!(maps_dir = %settings.maps_dir.display(), "map source ready");

    let mut planner = RoutePlanner::new();
    planner.add_observer(Box::new(RouteSummaryLogger));
    let mut ui = UiState::new(source.available_maps());

    let first_map = args.map_name.unwrap_or(settings.default_map);
    let ticket = planner.select_map(&first_map);
    loader.request(ticket, &first_map);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut planner, &mut ui, &loader, &mut logs, &log_receiver);

    // Restore terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    planner: &mut RoutePlanner,
    ui: &mut UiState,
    loader: &MapLoader,
    logs: &mut LogBuffer,
    log_receiver: &std::sync::mpsc::Receiver<String>,
) -> io::Result<()> {
    loop {
        for (ticket, result) in loader.poll() {
            if planner.complete_load(ticket, result) {
                ui.reset_cursors();
            }
        }
        logs.drain_from(log_receiver);

        terminal.draw(|frame| draw_ui(frame, planner, ui, logs))?;

        if !event::poll(Duration::from_millis(TICK_INTERVAL_MS))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                match handle_key(key, planner, ui) {
                    InputResult::Continue => {}
                    InputResult::Quit => return Ok(()),
                    InputResult::SwitchMap(name) => {
                        let ticket = planner.select_map(&name);
                        ui.reset_cursors();
                        loader.request(ticket, &name);
                    }
                }
            }
            Event::Mouse(mouse) => handle_mouse(mouse, planner, ui),
            _ => {}
        }
    }
}

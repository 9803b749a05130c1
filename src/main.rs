use anyhow::Result;
use clap::{error::ErrorKind, CommandFactory, Parser};
use clipdrill::{
    app_dirs::AppDirs,
    clipboard::SystemClipboard,
    config::{ConfigStore, FileConfigStore},
    game::{Control, Game, Settings},
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
    terminal::{self, TerminalGuard},
    variant::Variant,
};
use crossterm::tty::IsTty;
use log::{info, warn};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::Rect,
    Terminal,
};
use std::{
    io::{self, stdin},
    time::{Duration, Instant},
};

/// terminal trainer for copy, paste and text selection
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal trainer for the basic clipboard skills: copy and paste with the Mac or Windows shortcuts, or select exactly the text inside a box with the mouse. Ten rounds per session, with the text getting longer as you level up."
)]
pub struct Cli {
    /// which skill to practise (defaults to the last one used)
    #[clap(short = 'v', long, value_enum)]
    variant: Option<Variant>,

    /// seed for the text generator, for reproducible sessions
    #[clap(short = 's', long)]
    seed: Option<u64>,

    /// do not remember the chosen variant
    #[clap(long)]
    no_save: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(e) = logging::init(&path) {
            eprintln!("logging disabled: {e:#}");
        }
    }

    let store = FileConfigStore::new();
    let mut cfg = store.load();
    if let Some(variant) = cli.variant {
        if variant != cfg.variant && !cli.no_save {
            cfg.variant = variant;
            if let Err(e) = store.save(&cfg) {
                warn!("could not save config to {}: {e:#}", store.path().display());
            }
        }
        cfg.variant = variant;
    }
    info!("starting {} trainer", cfg.variant);

    terminal::install_panic_hook();
    // paste variants leave the mouse to the terminal's own selection
    let guard = TerminalGuard::enter(cfg.variant == Variant::Selection)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

    let mut settings = Settings::from(&cfg);
    settings.key_release_events = guard.keyboard_enhanced();
    let mut game = Game::new(
        cfg.variant,
        settings,
        Box::new(SystemClipboard),
        cli.seed,
    );

    let result = start_tui(&mut terminal, &mut game, cfg.tick_interval());
    drop(guard);
    result
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    game: &mut Game,
    tick_interval: Duration,
) -> Result<()> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick_interval));

    loop {
        let size = terminal.size()?;
        game.set_viewport(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|f| f.render_widget(&*game, f.area()))?;

        let event = runner.step();
        if game.handle_event(event, Instant::now()) == Control::Quit {
            break;
        }
    }

    info!("quit");
    Ok(())
}

//! fastor - terminal client for the Fastor restaurant pre-order service.
//!
//! Signs the user in with a phone number and one-time code, then shows the
//! restaurants near them.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{
        DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, EventStream, KeyEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{error, info, warn};

use fastor::application::{App, Outcome};
use fastor::domain::BANNER_INTERVAL_MS;
use fastor::infrastructure::{logging, Config, Dispatcher, HttpClient, SessionStore};
use fastor::presentation::{render_ui, InputHandler};

const HOUSEKEEPING_INTERVAL: Duration = Duration::from_millis(250);

/// Entry point.
///
/// Configuration and logging are set up before the terminal is touched so
/// that their errors reach the shell.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    logging::init(&config.log_filter, &config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file.display()))?;
    info!(api = %config.api_base, listing = %config.listing_base, "starting");

    let store = SessionStore::new(config.session_path.clone());
    let session = match store.load() {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, path = %store.path().display(), "ignoring unreadable session");
            None
        }
    };

    let api = HttpClient::new(&config).context("cannot build HTTP client")?;
    let (dispatcher, mut outcomes) = Dispatcher::new(Arc::new(api), store);
    let (mut app, effects) = App::new(config.policy, session);
    app.dial_code = config.dial_code.clone();
    dispatcher.dispatch(&mut app, effects);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &dispatcher, &mut outcomes).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "terminal error");
        return Err(err.into());
    }
    info!("bye");
    Ok(())
}

/// Banner autoplay timer. Rebuilt whenever the home screen is mounted or
/// its listing changes, dropped when autoplay stops.
#[derive(Default)]
struct BannerTimer {
    interval: Option<Interval>,
    armed_for: Option<usize>,
}

impl BannerTimer {
    fn sync(&mut self, app: &App) {
        let key = app
            .home
            .as_ref()
            .filter(|home| home.banner.should_autoplay())
            .map(|home| home.listings.len());
        if key == self.armed_for && self.interval.is_some() == key.is_some() {
            return;
        }

        self.armed_for = key;
        self.interval = key.map(|_| {
            let period = Duration::from_millis(BANNER_INTERVAL_MS);
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
    }

    async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending().await,
        }
    }
}

/// Main event loop: terminal input, finished requests and timers.
async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    dispatcher: &Dispatcher,
    outcomes: &mut UnboundedReceiver<Outcome>,
) -> io::Result<()> {
    let mut events = EventStream::new();
    let mut housekeeping = time::interval(HOUSEKEEPING_INTERVAL);
    let mut banner = BannerTimer::default();

    loop {
        terminal.draw(|f| render_ui(f, app))?;
        if app.should_quit {
            return Ok(());
        }
        banner.sync(app);

        tokio::select! {
            event = events.next() => match event {
                Some(Ok(event)) => handle_event(app, dispatcher, event),
                Some(Err(e)) => return Err(e),
                None => return Ok(()),
            },
            Some(outcome) = outcomes.recv() => {
                let commands = app.on_outcome(outcome);
                dispatcher.dispatch(app, commands);
            }
            _ = banner.tick() => app.banner_tick(),
            _ = housekeeping.tick() => app.expire_notifications(std::time::Instant::now()),
        }
    }
}

fn handle_event(app: &mut App, dispatcher: &Dispatcher, event: Event) {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            let commands = InputHandler::handle_key_event(app, key.code, key.modifiers);
            dispatcher.dispatch(app, commands);
        }
        Event::Mouse(mouse) => InputHandler::handle_mouse_event(app, mouse),
        Event::Paste(text) => InputHandler::handle_paste(app, &text),
        _ => {}
    }
}

use alternate::{
    alerts::DesktopAlerts,
    app::App,
    config::{ConfigStore, FileConfigStore},
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::SessionConfig,
    ui,
};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};
use tracing::{info, warn};

/// pair programming timer that tells you when to switch drivers
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A terminal turn timer for pair programming. Each player drives for a fixed number of minutes, then the timer rings and asks you to switch."
)]
pub struct Cli {
    /// minutes per turn (saved as the new default)
    #[clap(short = 'd', long, value_parser = clap::value_parser!(u32).range(1..))]
    duration: Option<u32>,

    /// rounds per session, 0 for unlimited (saved as the new default)
    #[clap(short = 'r', long)]
    rounds: Option<u32>,

    /// settings file to use instead of the platform default
    #[clap(long)]
    config: Option<PathBuf>,

    /// do not play the alarm sound
    #[clap(long)]
    mute: bool,

    /// do not show desktop notifications
    #[clap(long)]
    no_notify: bool,

    /// log at debug level
    #[clap(short = 'v', long)]
    verbose: bool,
}

impl Cli {
    fn store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }

    /// Fold command-line overrides into the stored settings
    fn overrides(&self, stored: Option<SessionConfig>) -> Option<SessionConfig> {
        if self.duration.is_none() && self.rounds.is_none() {
            return None;
        }
        let base = stored.unwrap_or_default().sanitized();
        Some(SessionConfig::new(
            self.duration.unwrap_or(base.duration_minutes),
            self.rounds.unwrap_or(base.total_cycles),
        ))
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let _log_guard = logging::init(cli.verbose);

    let store = cli.store();
    if let Some(cfg) = cli.overrides(store.load()) {
        info!(?cfg, "applying command-line settings");
        if let Err(e) = store.save(&cfg) {
            warn!(error = %e, path = %store.path().display(), "could not save settings");
        }
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = CrosstermEventSource::new();
    let alerts = DesktopAlerts::new(!cli.mute, !cli.no_notify).with_actions(events.sender());
    let mut app = App::new(store, alerts);
    let res = start_tui(&mut terminal, &mut app, events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    res
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<FileConfigStore, DesktopAlerts>,
    events: CrosstermEventSource,
) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(events, FixedTicker::every_second());

    loop {
        terminal.draw(|f| ui::draw(app, f))?;

        let generation = app.timer_generation();
        match runner.step() {
            AppEvent::Tick => app.on_tick(),
            AppEvent::Key(key) => app.on_key(key),
            AppEvent::NotificationAction => app.on_notification_action(),
            AppEvent::Resize => {}
        }

        if app.should_quit {
            break;
        }
        // a fresh countdown gets a full second before its first tick
        if app.timer_generation() != generation {
            runner.realign();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["alternate"]);

        assert_eq!(cli.duration, None);
        assert_eq!(cli.rounds, None);
        assert_eq!(cli.config, None);
        assert!(!cli.mute);
        assert!(!cli.no_notify);
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_duration() {
        let cli = Cli::parse_from(["alternate", "-d", "5"]);
        assert_eq!(cli.duration, Some(5));

        let cli = Cli::parse_from(["alternate", "--duration", "7"]);
        assert_eq!(cli.duration, Some(7));
    }

    #[test]
    fn test_cli_rejects_zero_duration() {
        assert!(Cli::try_parse_from(["alternate", "-d", "0"]).is_err());
    }

    #[test]
    fn test_cli_rounds() {
        let cli = Cli::parse_from(["alternate", "-r", "0"]);
        assert_eq!(cli.rounds, Some(0));

        let cli = Cli::parse_from(["alternate", "--rounds", "4"]);
        assert_eq!(cli.rounds, Some(4));
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "alternate",
            "--mute",
            "--no-notify",
            "-v",
            "--config",
            "/tmp/alt.json",
        ]);
        assert!(cli.mute);
        assert!(cli.no_notify);
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/alt.json")));
    }

    #[test]
    fn test_overrides_merge_with_stored() {
        let cli = Cli::parse_from(["alternate", "-r", "4"]);
        assert_eq!(
            cli.overrides(Some(SessionConfig::new(6, 0))),
            Some(SessionConfig::new(6, 4))
        );
        assert_eq!(cli.overrides(None), Some(SessionConfig::new(3, 4)));

        let cli = Cli::parse_from(["alternate"]);
        assert_eq!(cli.overrides(Some(SessionConfig::new(6, 0))), None);
    }

    #[test]
    fn test_cli_help() {
        let result = Cli::try_parse_from(["alternate", "--help"]);
        assert!(result.is_err());
        if let Err(e) = result {
            assert_eq!(e.kind(), clap::error::ErrorKind::DisplayHelp);
        }
    }

    #[test]
    fn test_cli_invalid_args() {
        let result = Cli::try_parse_from(["alternate", "--invalid-flag"]);
        assert!(result.is_err());

        let result = Cli::try_parse_from(["alternate", "-d", "not-a-number"]);
        assert!(result.is_err());
    }
}

//! Slide Descent entry point
//!
//! Native text driver: reads commands from stdin, feeds them to a
//! `GameSession` and prints what a HUD would show.
//!
//! ```text
//! slide-descent [--map <file|practice|descent>] [--settings <file.json>] [--json]
//! ```

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use slide_descent::sim::{Direction, GameEvent, GameSession};
use slide_descent::{Result, Settings, levels};

const HELP: &str = "\
Commands:
  l | r | u | d        slide left / right / up / down
  tick <ms>            advance the avalanche clock
  commit               settle the displayed score and feet
  status               print the HUD
  reset                start the level over
  help                 this text
  quit                 exit";

#[derive(Debug, Parser)]
#[command(name = "slide-descent")]
#[command(about = "Slide down the mountain before the avalanche catches you")]
#[command(after_help = HELP)]
struct Cli {
    /// Map file, or a built-in level name (practice, descent)
    #[arg(long)]
    map: Option<String>,
    /// Settings JSON file
    #[arg(long = "settings")]
    settings_path: Option<PathBuf>,
    /// Print the HUD as JSON snapshots
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Built-in level name, or a path to a map file
fn load_map(map: Option<&str>) -> Result<String> {
    match map {
        None => Ok(levels::DESCENT.to_string()),
        Some(name) => match levels::by_name(name) {
            Some(builtin) => Ok(builtin.to_string()),
            None => Ok(std::fs::read_to_string(name)?),
        },
    }
}

/// Driver state holding the session
struct Game {
    session: GameSession,
    json: bool,
}

impl Game {
    fn print_status(&self, out: &mut impl Write) -> Result<()> {
        if self.json {
            writeln!(out, "{}", serde_json::to_string(&self.session.snapshot())?)?;
            return Ok(());
        }

        let pos = self.session.position();
        let avalanche = self.session.avalanche();
        writeln!(
            out,
            "({}, {})  {}  {}  [{:?}]  avalanche: {:?} {}/{}",
            pos.x,
            pos.y,
            self.session.format_score(),
            self.session.format_feet(),
            self.session.phase(),
            avalanche.state(),
            avalanche.progress(),
            avalanche.grid_length(),
        )?;
        Ok(())
    }

    fn print_events(&mut self, out: &mut impl Write) -> Result<()> {
        for event in self.session.drain_events() {
            match event {
                GameEvent::Moved { .. } | GameEvent::CoinCollected { .. } => {}
                GameEvent::GoalReached { .. } => writeln!(out, "*** you made it down! ***")?,
                GameEvent::PlayerCaught { .. } => writeln!(out, "*** the avalanche got you ***")?,
                GameEvent::AvalancheStarted => writeln!(out, "the ground starts to shake...")?,
                other => log::debug!("{:?}", other),
            }
        }
        for coin in self.session.drain_consumed_coins() {
            writeln!(out, "  +${} at ({}, {})", coin.value, coin.pos.x, coin.pos.y)?;
        }
        Ok(())
    }

    /// Handle one input line. Returns false on quit.
    fn handle(&mut self, line: &str, out: &mut impl Write) -> Result<bool> {
        let mut words = line.split_whitespace();
        let Some(cmd) = words.next() else {
            return Ok(true);
        };

        if let Some(dir) = Direction::from_str(cmd) {
            match self.session.apply_move(dir) {
                Ok(result) if !result.moved() => writeln!(out, "blocked")?,
                Ok(_) => {}
                Err(e) => writeln!(out, "{e}")?,
            }
        } else {
            match cmd {
                "tick" | "t" => match words.next().map(str::parse::<u64>) {
                    Some(Ok(ms)) => self.session.tick(ms),
                    _ => writeln!(out, "usage: tick <ms>")?,
                },
                "commit" | "c" => {
                    self.session.commit_score();
                    self.session.commit_feet();
                }
                "reset" => self.session.reset(),
                "status" | "s" => {}
                "help" | "?" => {
                    writeln!(out, "{HELP}")?;
                    return Ok(true);
                }
                "quit" | "q" | "exit" => return Ok(false),
                other => {
                    writeln!(out, "unknown command {other:?} (try help)")?;
                    return Ok(true);
                }
            }
        }

        self.print_events(out)?;
        self.print_status(out)?;
        Ok(true)
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let settings = match &cli.settings_path {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let map = load_map(cli.map.as_deref())?;
    let session = GameSession::from_map(&map, settings)?;

    let mut game = Game {
        session,
        json: cli.json,
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    game.print_status(&mut out)?;

    for line in stdin.lock().lines() {
        let line = line?;
        if !game.handle(line.trim(), &mut out)? {
            break;
        }
        out.flush()?;
    }

    log::info!("Final score {}", game.session.ledger().score_buffer());
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Slide Descent starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

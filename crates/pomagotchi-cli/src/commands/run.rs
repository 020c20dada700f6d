//! Interactive timer session.
//!
//! Reads one command per line from stdin while the tick receiver drives the
//! countdown. End of input quits.

use clap::Args;
use pomagotchi_core::timer::tokio_ticker;
use pomagotchi_core::{
    Config, GameGateway, Presenter, SelectedDuration, Session, SqliteGateway, TickScheduler,
    TimerPhase, UndoOutcome,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::terminal::{creature_line, progress_line, TerminalPresenter};

#[derive(Args)]
pub struct RunArgs {
    /// Session length in minutes
    #[arg(long)]
    pub minutes: Option<u32>,
    /// Additional seconds
    #[arg(long)]
    pub seconds: Option<u32>,
    /// Print every timer event as a JSON line
    #[arg(long)]
    pub events: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Done,
    Set { minutes: u32, seconds: u32 },
    Preset(usize),
    ResetData,
    Undo,
    Status,
    Help,
    Quit,
}

const HELP: &str = "\
commands:
  start            start or resume the countdown
  pause            pause the countdown
  reset            stop and reload the selected duration
  done             finish the current session early
  set M [S]        select a duration (not while running)
  preset N         select configured preset N (1-based)
  reset-data       wipe all progress (can be undone)
  undo             restore data wiped by reset-data
  status           show timer, creature and progress
  help             show this list
  quit             leave";

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let number = |s: &str| {
        s.parse::<u32>()
            .map_err(|_| format!("not a number: {s}"))
    };

    let command = match (name.to_lowercase().as_str(), args.as_slice()) {
        ("start" | "resume", []) => Command::Start,
        ("pause", []) => Command::Pause,
        ("reset", []) => Command::Reset,
        ("done" | "complete", []) => Command::Done,
        ("set", [minutes]) => Command::Set {
            minutes: number(*minutes)?,
            seconds: 0,
        },
        ("set", [minutes, seconds]) => Command::Set {
            minutes: number(*minutes)?,
            seconds: number(*seconds)?,
        },
        ("preset", [index]) => match number(*index)? {
            0 => return Err("presets are numbered from 1".into()),
            n => Command::Preset(n as usize),
        },
        ("reset-data", []) => Command::ResetData,
        ("undo", []) => Command::Undo,
        ("status", []) => Command::Status,
        ("help" | "?", []) => Command::Help,
        ("quit" | "exit" | "q", []) => Command::Quit,
        (other, _) => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(command))
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let gateway = SqliteGateway::open_default()?;
    let runtime = super::runtime()?;
    let result = runtime.block_on(interactive(args, config, gateway));
    // A pending stdin read would otherwise hold up shutdown.
    runtime.shutdown_background();
    result
}

async fn interactive(
    args: RunArgs,
    config: Config,
    gateway: SqliteGateway,
) -> Result<(), Box<dyn std::error::Error>> {
    let (ticker, mut ticks) = tokio_ticker();
    let presenter = TerminalPresenter::new(args.events);
    let mut session = Session::new(gateway, ticker, presenter, config.session_config());
    session.load().await;

    if args.minutes.is_some() || args.seconds.is_some() {
        session.set_duration(args.minutes.unwrap_or(0), args.seconds.unwrap_or(0));
    }
    println!("\n{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => execute(&mut session, &config.timer.presets, command).await,
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }
            Some(()) = ticks.recv() => {
                session.tick().await;
            }
        }
    }

    // Keep the remaining time: a running countdown is not written to disk.
    if session.phase() == TimerPhase::Running {
        session.pause().await;
    }
    println!();
    Ok(())
}

async fn execute<G, S, P>(
    session: &mut Session<G, S, P>,
    presets: &[SelectedDuration],
    command: Command,
) where
    G: GameGateway,
    S: TickScheduler,
    P: Presenter,
{
    match command {
        Command::Start => {
            if !session.start() {
                println!("already running");
            }
        }
        Command::Pause => {
            if !session.pause().await {
                println!("not running");
            }
        }
        Command::Reset => session.reset().await,
        Command::Done => {
            if session.complete_now().await.is_none() {
                println!("no session in progress");
            }
        }
        Command::Set { minutes, seconds } => {
            if !session.set_duration(minutes, seconds) {
                println!("cannot change the duration now");
            }
        }
        Command::Preset(n) => match presets.get(n - 1) {
            Some(preset) => {
                if !session.set_duration(preset.minutes, preset.seconds) {
                    println!("cannot change the duration now");
                }
            }
            None => println!("no preset {n} ({} configured)", presets.len()),
        },
        Command::ResetData => {
            session.reset_all_data().await;
        }
        Command::Undo => {
            if session.undo_data_reset().await == UndoOutcome::Restored {
                println!("{}", creature_line(session.creature()));
            }
        }
        Command::Status => {
            println!(
                "\ntimer: {} [{:?}] of {}",
                session.timer(),
                session.phase(),
                session.selected()
            );
            println!("{}", creature_line(session.creature()));
            println!("{}", progress_line(session.progress()));
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

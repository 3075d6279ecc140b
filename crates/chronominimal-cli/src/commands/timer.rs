use clap::Subcommand;
use chronominimal_core::{now_ms, Action, Config, Controller, Database, Event, TimerId};

use crate::render;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Add a stopped timer at the end of the list
    Add {
        /// Optional label (defaults to "Timer <id>")
        label: Option<String>,
    },
    /// List timers
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the full state snapshot as JSON
    Status,
    /// Rename a timer (a blank label resets to the default)
    Rename { id: TimerId, label: String },
    /// Start or stop a timer
    Toggle { id: TimerId },
    /// Stop a timer and zero its elapsed time
    Reset { id: TimerId },
    /// Delete a timer (the last timer cannot be deleted)
    Remove { id: TimerId },
    /// Move a timer to another timer's position
    Move { source: TimerId, target: TimerId },
}

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

pub fn run(action: TimerAction) -> CliResult {
    let config = Config::load()?;
    let db = Database::open()?;
    let now = now_ms();
    let mut ctl = Controller::load(db, &config, now);

    let result = apply(&mut ctl, action, now, config.display.show_hundredths);
    ctl.shutdown();
    result
}

fn apply(
    ctl: &mut Controller<Database>,
    action: TimerAction,
    now: u64,
    show_hundredths: bool,
) -> CliResult {
    match action {
        TimerAction::Add { label } => {
            let created = ctl
                .dispatch(Action::AddTimer, now)
                .ok_or("failed to create timer")?;
            print_event(&created)?;
            if let Some(label) = label {
                if let Some(renamed) = ctl.dispatch(Action::Rename(created.timer_id(), label), now) {
                    print_event(&renamed)?;
                }
            }
        }
        TimerAction::List { json } => {
            let snapshot = ctl.snapshot(now);
            if json {
                println!("{}", serde_json::to_string_pretty(&snapshot.timers)?);
            } else {
                for line in render::list_lines(&snapshot, show_hundredths) {
                    println!("{line}");
                }
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&ctl.snapshot(now))?);
        }
        TimerAction::Rename { id, label } => {
            require(ctl, id)?;
            match ctl.dispatch(Action::Rename(id, label), now) {
                Some(event) => print_event(&event)?,
                None => eprintln!("label unchanged"),
            }
        }
        TimerAction::Toggle { id } => {
            require(ctl, id)?;
            dispatch_and_print(ctl, Action::Toggle(id), now)?;
        }
        TimerAction::Reset { id } => {
            require(ctl, id)?;
            dispatch_and_print(ctl, Action::Reset(id), now)?;
        }
        TimerAction::Remove { id } => {
            require(ctl, id)?;
            if ctl.ledger().count() <= 1 {
                return Err("cannot remove the only remaining timer".into());
            }
            dispatch_and_print(ctl, Action::Remove(id), now)?;
        }
        TimerAction::Move { source, target } => {
            require(ctl, source)?;
            require(ctl, target)?;
            match ctl.dispatch(Action::Reorder { source, target }, now) {
                Some(event) => print_event(&event)?,
                None => eprintln!("order unchanged"),
            }
        }
    }
    Ok(())
}

fn require(ctl: &Controller<Database>, id: TimerId) -> CliResult {
    if ctl.ledger().get(id).is_none() {
        return Err(format!("no timer with id {id}").into());
    }
    Ok(())
}

fn dispatch_and_print(ctl: &mut Controller<Database>, action: Action, now: u64) -> CliResult {
    let event = ctl
        .dispatch(action, now)
        .ok_or("timer state did not change")?;
    print_event(&event)
}

fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

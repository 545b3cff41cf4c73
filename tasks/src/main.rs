//! Interactive task list shell.
//!
//! Reads one command per line from stdin, dispatches it to the task store and
//! prints the resulting view. Type `help` for the command list.

use anyhow::{Context, bail};
use chrono::{Local, Offset};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use taskdeck::render::{html, text};
use taskdeck::{
    FilterSelector, InMemoryRepository, Priority, SeededRepository, Session, TaskAction,
    TaskEnvironment, TaskId, TaskReducer, TaskRepository, TaskdeckConfig, ViewProjector,
};
use taskdeck_core::environment::{Clock, SystemClock};
use taskdeck_runtime::Store;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HELP: &str = "\
Commands:
  add [low|medium|high] <text>    add a task (newest first)
  toggle <id>                     mark a task done / not done
  delete <id>                     delete a task
  edit <id>                       open a task in the editor
  save <id> [priority] <text>     save the task being edited
  cancel                          close the editor without saving
  filter <all|completed|pending|low|medium|high>
  html                            print the current view as HTML
  help                            show this message
  quit                            leave

A leading priority word is only read as the priority when text follows it.
Put `--` before text that starts with one: add -- low battery warning";

/// A parsed input line
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Goes straight to the store
    Dispatch(TaskAction),
    /// Needs confirmation first
    Delete(TaskId),
    /// Priority is filled from the task when omitted
    Save {
        id: TaskId,
        priority: Option<Priority>,
        text: String,
    },
    Html,
    Help,
    Quit,
}

/// Splits off the first whitespace-delimited word
fn next_word(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim_start()),
        None => (input, ""),
    }
}

/// Strips a leading `--` separator
fn literal(input: &str) -> &str {
    match next_word(input) {
        ("--", rest) => rest,
        _ => input,
    }
}

/// Reads an optional leading priority keyword
///
/// A priority word with nothing after it is the text itself. Anything after
/// `--` is always text.
fn priority_and_text(input: &str) -> (Option<Priority>, &str) {
    let (word, rest) = next_word(input);
    if word == "--" {
        return (None, rest);
    }
    match word.parse::<Priority>() {
        Ok(priority) if !rest.is_empty() => (Some(priority), literal(rest)),
        _ => (None, input),
    }
}

fn parse_id(input: &str) -> anyhow::Result<(TaskId, &str)> {
    let (word, rest) = next_word(input);
    if word.is_empty() {
        bail!("Missing task id");
    }
    Ok((word.parse()?, rest))
}

fn parse_command(line: &str, default_priority: Priority) -> anyhow::Result<Option<Command>> {
    let (name, rest) = next_word(line);
    let command = match name.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "add" => {
            let (priority, text) = priority_and_text(rest);
            Command::Dispatch(TaskAction::Add {
                text: text.to_string(),
                priority: priority.unwrap_or(default_priority),
            })
        },
        "toggle" => Command::Dispatch(TaskAction::Toggle {
            id: parse_id(rest)?.0,
        }),
        "delete" => Command::Delete(parse_id(rest)?.0),
        "edit" => Command::Dispatch(TaskAction::EditStart {
            id: parse_id(rest)?.0,
        }),
        "save" => {
            let (id, rest) = parse_id(rest)?;
            let (priority, text) = priority_and_text(rest);
            Command::Save {
                id,
                priority,
                text: text.to_string(),
            }
        },
        "cancel" => Command::Dispatch(TaskAction::EditCancel),
        "filter" => Command::Dispatch(TaskAction::SetFilter {
            filter: rest.parse::<FilterSelector>()?,
        }),
        "html" => Command::Html,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => bail!("Unknown command '{other}' (type 'help')"),
    };
    Ok(Some(command))
}

/// Asks the delete question; anything but yes keeps the task
fn confirm<L, W>(lines: &mut L, out: &mut W) -> io::Result<bool>
where
    L: Iterator<Item = io::Result<String>>,
    W: Write,
{
    write!(out, "Are you sure you want to delete this task? [y/N] ")?;
    out.flush()?;
    match lines.next() {
        Some(answer) => Ok(matches!(
            answer?.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        )),
        None => Ok(false),
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = TaskdeckConfig::from_env().context("Failed to load configuration")?;

    // Initialize tracing; RUST_LOG wins over TASKDECK_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    tracing::info!(seed = config.seed, "Starting taskdeck");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository: Arc<dyn TaskRepository> = if config.seed {
        Arc::new(SeededRepository::new(Arc::clone(&clock)))
    } else {
        Arc::new(InMemoryRepository::new())
    };

    let session = Session::restore(repository.as_ref()).context("Failed to load tasks")?;
    let projector = ViewProjector::new(config.time_format.clone(), Local::now().offset().fix());
    let mut store = Store::new(session, TaskReducer::new(), TaskEnvironment::new(clock, repository));

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    println!("{HELP}\n");
    print!("{}", text::render(&store.state(|s| s.view(&projector))));

    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next() else {
            break;
        };

        let command = match parse_command(&line?, config.default_priority) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("! {e}");
                continue;
            },
        };

        match command {
            Command::Dispatch(action) => {
                store.send(action)?;
            },
            Command::Delete(id) => {
                if !store.state(|s| s.store.contains(id)) {
                    println!("! No task #{id}");
                    continue;
                }
                if !config.confirm_delete || confirm(&mut lines, &mut stdout)? {
                    store.send(TaskAction::Delete { id })?;
                }
            },
            Command::Save { id, priority, text } => {
                if store.state(|s| s.edit_mode.editing()) != Some(id) {
                    println!("! Task #{id} is not open in the editor (use 'edit {id}' first)");
                    continue;
                }
                let priority = priority
                    .or_else(|| store.state(|s| s.store.get(id).map(|task| task.priority)))
                    .unwrap_or(config.default_priority);
                store.send(TaskAction::EditSave { id, text, priority })?;
            },
            Command::Html => {
                println!("{}", html::render(&store.state(|s| s.view(&projector))));
                continue;
            },
            Command::Help => {
                println!("{HELP}");
                continue;
            },
            Command::Quit => break,
        }

        let (last_error, save_error) = store.state(|s| (s.last_error, s.save_error.clone()));
        if let Some(error) = last_error {
            println!("! {error}");
        }
        if let Some(error) = save_error {
            println!("! Could not save tasks: {error}");
        }
        print!("{}", text::render(&store.state(|s| s.view(&projector))));
    }

    tracing::info!("Goodbye");
    Ok(())
}

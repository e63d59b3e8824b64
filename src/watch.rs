//! Interactive re-charting driven by selection changes on stdin.
//!
//! Each accepted line (`city=Mumbai`, `fuel=Diesel`, `year=2021`) updates the
//! session's selection and starts a pipeline run on a worker thread. Results
//! come back over a channel to this thread, which owns the session; only the
//! result for the most recent selection is rendered.

use std::{
    io::{self, BufRead, Write},
    sync::{Arc, mpsc},
    thread,
};

use anyhow::{Context, Result, bail};
use log::{debug, info, warn};

use crate::{
    cli::WatchArgs,
    columns::ColumnAliases,
    config::DashboardConfig,
    filter::FilterCriteria,
    io_utils,
    pipeline::{ChartOutcome, Completion, Dataset, SelectionEvent, SelectionSession, Ticket},
    render::{self, OutputFormat},
    rows::DataSource,
};

enum Event {
    Line(String),
    InputClosed,
    Loaded(Ticket, ChartOutcome),
}

/// Supplies the dataset for a run: a shared cached parse, or a fresh fetch.
#[derive(Clone)]
enum Loader {
    Cached(Arc<Dataset>),
    Reload(DataSource, ColumnAliases),
}

impl Loader {
    fn chart(&self, criteria: &FilterCriteria) -> ChartOutcome {
        match self {
            Loader::Cached(dataset) => dataset.chart(criteria),
            Loader::Reload(source, columns) => Dataset::load(source, columns.clone()).chart(criteria),
        }
    }
}

/// Stdin carries selection changes, so the dataset must come from a file.
pub fn execute(config: &DashboardConfig, source: DataSource, args: &WatchArgs) -> Result<()> {
    if io_utils::is_dash(&source.path) {
        bail!("watch reads selections from stdin; pass the dataset as a file with -i <path>");
    }
    let loader = if args.reload {
        Loader::Reload(source, config.columns.clone())
    } else {
        Loader::Cached(Arc::new(Dataset::load(&source, config.columns.clone())))
    };
    let (sender, receiver) = mpsc::channel();
    spawn_stdin_reader(sender.clone());

    let mut session = SelectionSession::new(config.default_criteria());
    let mut stdout = io::stdout();
    let ticket = session.begin();
    spawn_run(&loader, ticket, session.criteria().clone(), sender.clone());

    let mut input_open = true;
    while input_open || !session.is_settled() {
        let event = receiver
            .recv()
            .context("Selection channel closed unexpectedly")?;
        match event {
            Event::Line(line) if input_open => {
                match handle_line(config, &mut session, &line) {
                    LineAction::Run(ticket, criteria) => {
                        spawn_run(&loader, ticket, criteria, sender.clone())
                    }
                    LineAction::Show => show(&mut stdout, &session, args.format)?,
                    LineAction::Quit => input_open = false,
                    LineAction::Ignore => {}
                }
            }
            Event::Line(_) => {}
            Event::InputClosed => input_open = false,
            Event::Loaded(ticket, outcome) => {
                if session.complete(ticket, outcome) == Completion::Published {
                    show(&mut stdout, &session, args.format)?;
                }
            }
        }
    }
    info!("Watch finished after {} run(s)", session.latest().map_or(0, Ticket::sequence));
    Ok(())
}

enum LineAction {
    Run(Ticket, FilterCriteria),
    Show,
    Quit,
    Ignore,
}

fn handle_line(config: &DashboardConfig, session: &mut SelectionSession, line: &str) -> LineAction {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => return LineAction::Ignore,
        "show" => return LineAction::Show,
        "quit" | "exit" => return LineAction::Quit,
        _ => {}
    }
    let event = match trimmed
        .parse::<SelectionEvent>()
        .and_then(|event| canonicalize(config, event))
    {
        Ok(event) => event,
        Err(err) => {
            warn!("Ignoring '{trimmed}': {err:#}");
            return LineAction::Ignore;
        }
    };
    debug!("Selection changed: {event:?}");
    let (ticket, criteria) = session.select(event);
    LineAction::Run(ticket, criteria)
}

fn canonicalize(config: &DashboardConfig, event: SelectionEvent) -> Result<SelectionEvent> {
    Ok(match event {
        SelectionEvent::City(city) => SelectionEvent::City(config.resolve_city(&city)?),
        SelectionEvent::Fuel(fuel) => SelectionEvent::Fuel(config.resolve_fuel(&fuel)?),
        SelectionEvent::Year(year) => SelectionEvent::Year(config.resolve_year(year)?),
    })
}

fn show<W: Write>(writer: &mut W, session: &SelectionSession, format: OutputFormat) -> Result<()> {
    match session.published() {
        Some(outcome) => render::write_chart(writer, outcome, format),
        None => {
            debug!("No chart published yet");
            Ok(())
        }
    }
}

fn spawn_run(loader: &Loader, ticket: Ticket, criteria: FilterCriteria, sender: mpsc::Sender<Event>) {
    let loader = loader.clone();
    thread::spawn(move || {
        let outcome = loader.chart(&criteria);
        // The receiver is gone only once the watch loop has returned.
        let _ = sender.send(Event::Loaded(ticket, outcome));
    });
}

fn spawn_stdin_reader(sender: mpsc::Sender<Event>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if sender.send(Event::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    warn!("Stopped reading selections: {err}");
                    break;
                }
            }
        }
        let _ = sender.send(Event::InputClosed);
    });
}

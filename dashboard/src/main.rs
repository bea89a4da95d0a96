mod actions;
mod app;
mod cmdreactor;
mod input;
mod keymap;
mod stateful_list;
mod term;
mod ui;

use std::{error::Error, path::PathBuf, sync::Arc, time::Duration};

use app::App;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use cmdreactor::CommandResult;
use commit_filter::{CoordinatorOptions, FilterHolder, FilterOptions, FilterState, RangePolicy};
use commit_source::{GitSource, DATE_FORMAT};
use input::InputEvent;
use log::{info, trace};
use tokio::select;
use tui_textarea::{Input, Key};

use crate::{cmdreactor::CmdReactor, keymap::Keymap, term::Term};

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected yyyy-mm-dd: {e}"))
}

/// Your commits across local git repositories, filtered by contributor and date range
#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// git repository path, may be repeated
    #[clap(short, long, default_value = ".")]
    repository: Vec<PathBuf>,
    /// look at all refs instead of HEAD only
    #[clap(long)]
    all: bool,
    /// first day of the window (yyyy-mm-dd), today by default
    #[clap(long, value_parser = parse_date)]
    since: Option<NaiveDate>,
    /// last day of the window (yyyy-mm-dd), today by default
    #[clap(long, value_parser = parse_date)]
    until: Option<NaiveDate>,
    /// contributor selected once the directory is loaded
    #[clap(short, long)]
    author: Option<String>,
    /// what to do when since is after until: pass-through, swap or reject
    #[clap(long, default_value_t = RangePolicy::default())]
    range_policy: RangePolicy,
    /// let superseded queries run to completion instead of aborting them
    #[clap(long)]
    keep_superseded: bool,
}

#[allow(clippy::single_match)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if let Err(err) = syslog::init_unix(syslog::Facility::LOG_USER, log::LevelFilter::Trace) {
        eprintln!("Could not init syslog: {}", err);
    } else {
        log_panics::init();
    }

    let cli = Cli::parse();
    let source = GitSource::open(&cli.repository, cli.all).await?;
    info!(
        "Watching {} repositories",
        source.repositories().len()
    );

    let today = Utc::now().date_naive();
    let state = FilterState::new(cli.since.unwrap_or(today), cli.until.unwrap_or(today));
    let options = FilterOptions {
        range_policy: cli.range_policy,
        coordinator: CoordinatorOptions {
            abort_superseded: !cli.keep_superseded,
        },
    };
    let filter = FilterHolder::new(Arc::new(source), options, state);

    // TODO: read bindings from a config file
    let keymap = Keymap::default()
        .bind("q", "quit")
        .bind("<c-c>", "quit")
        .bind("k", "up")
        .bind("j", "down")
        .bind("<c-u>", "pageup")
        .bind("<c-d>", "pagedown")
        .bind("g", "top")
        .bind("G", "bottom")
        .bind("a", "pick")
        .bind("s", "edit_since")
        .bind("u", "edit_until")
        .bind("[", "shift_since -1")
        .bind("]", "shift_since 1")
        .bind("{", "shift_until -1")
        .bind("}", "shift_until 1")
        .bind("r", "refresh")
        .bind("y", "yank")
        .bind("o", "open")
        .bind("?", "help")
        .bind(":", "mode command");

    let mut cmd_reactor = CmdReactor::new();
    cmd_reactor.add_commands(actions::actions());

    let context = actions::Context {
        app: App::new(filter, cli.author),
        clipboard: copypasta::ClipboardContext::new().ok(),
        input: input::Input::new(Duration::from_millis(120)),
        term: Term::new()?,
        keymap,
        help: cmd_reactor.usage().collect(),
    };

    mainloop(context, cmd_reactor).await
}

async fn mainloop<'a>(
    mut context: actions::Context<'a>,
    mut cmd_reactor: CmdReactor<actions::Context<'a>>,
) -> Result<(), Box<dyn Error>> {
    context.app.initialize();

    while !context.app.should_quit {
        trace!("loop");

        context.render()?;

        select! {
            _ = context.app.process() => {},
            event = context.input.next() => {
                handle_input_event(event, &mut context, &mut cmd_reactor);
            },
        }
    }
    Ok(())
}

fn execute<'a>(
    cmd_reactor: &mut CmdReactor<actions::Context<'a>>,
    ctx: &mut actions::Context<'a>,
    line: &str,
) {
    let mut inner_fn = || -> CommandResult {
        let words = shlex::split(line).ok_or_else(|| "Failed to parse command line".to_owned())?;
        let name = words
            .first()
            .ok_or_else(|| "There's no name in command line".to_owned())?;

        let args: Result<Vec<_>, _> = words
            .iter()
            .skip(1)
            .map(|a| -> Result<String, String> {
                match a.as_str() {
                    "%sha" => ctx.app.current_sha().ok_or_else(|| "No sha".to_owned()),
                    "%url" => ctx.app.current_url().ok_or_else(|| "No url".to_owned()),
                    "%author" => ctx
                        .app
                        .filter
                        .state()
                        .selected_contributor()
                        .map(|c| c.login.clone())
                        .ok_or_else(|| "No contributor".to_owned()),
                    "%%" => Ok("%".to_owned()),
                    _ => Ok(a.to_owned()),
                }
            })
            .collect();
        let args = args?;

        cmd_reactor.execute(ctx, name, args)
    };

    match inner_fn() {
        Ok(..) => {}
        Err(e) => ctx.app.status = e,
    };
    ctx.app.sync_list();
}

fn handle_input_event<'a>(
    event: InputEvent,
    context: &mut actions::Context<'a>,
    cmd_reactor: &mut CmdReactor<actions::Context<'a>>,
) {
    match event {
        InputEvent::Tick => context.app.tick(),
        InputEvent::Event(crossterm::event::Event::Key(e)) => match context.app.mode() {
            app::Mode::Normal => match context.keymap.action(&e) {
                Some(action) => execute(cmd_reactor, context, action),
                None => context.app.status = format!("Not handled: {:?}", e.code),
            },
            app::Mode::Command(_cmd) => {
                let textarea = &mut context.app.textarea;
                match e.into() {
                    Input { key: Key::Esc, .. } => context.app.mode_set(app::Mode::Normal),
                    Input {
                        key: Key::Enter, ..
                    }
                    | Input {
                        key: Key::Char('m'),
                        ctrl: true,
                        ..
                    } => {
                        let cmd = textarea
                            .lines()
                            .last()
                            .and_then(|l| l.get(1..))
                            .unwrap_or_default()
                            .to_owned();
                        context.app.status = format!("Command: {}", cmd);
                        context.app.mode_set(app::Mode::Normal);

                        execute(cmd_reactor, context, cmd.as_str());
                    }
                    input => {
                        if textarea.input(input)
                            && textarea.lines().last().map_or(true, |l| l.is_empty())
                        {
                            context.app.status = "Command mode quit".to_owned();
                            context.app.mode_set(app::Mode::Normal);
                        }
                    }
                }
            }
        },
        _ => {}
    }
}

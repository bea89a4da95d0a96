use chrono::{Duration, NaiveDate};
use commit_source::{Contributor, DATE_FORMAT};
use copypasta::{ClipboardContext, ClipboardProvider};
use log::debug;
use skim::prelude::*;

use crate::{
    app::{App, Mode},
    cmdreactor::{Command, CommandResult},
    input::Input,
    keymap::Keymap,
    term::Term,
};

macro_rules! AssertArgs {
    ($args:ident, $len:expr) => {
        if $args.len() != $len {
            return Err(format!("Expected {} argument, got {}", $len, $args.len()));
        }
    };
}

pub struct Context<'a> {
    pub app: App<'a>,
    pub input: Input,
    pub clipboard: Option<ClipboardContext>,
    pub term: Term,
    pub keymap: Keymap,
    /// filled from the reactor once all commands are registered
    pub help: Vec<&'static str>,
}

pub fn actions<'a>() -> Vec<Command<Context<'a>>> {
    vec![
        Command::new("echo", "echo <text..>", echo),
        Command::new("quit", "quit", quit),
        Command::new("up", "up", up),
        Command::new("down", "down", down),
        Command::new("pageup", "pageup", page_up),
        Command::new("pagedown", "pagedown", page_down),
        Command::new("top", "top", top),
        Command::new("bottom", "bottom", bottom),
        Command::new("author", "author <login>", author),
        Command::new("pick", "pick - fuzzy find a contributor", pick),
        Command::new("since", "since <yyyy-mm-dd>", since),
        Command::new("until", "until <yyyy-mm-dd>", until),
        Command::new("shift_since", "shift_since <days>", shift_since),
        Command::new("shift_until", "shift_until <days>", shift_until),
        Command::new("edit_since", "edit_since", edit_since),
        Command::new("edit_until", "edit_until", edit_until),
        Command::new("refresh", "refresh", refresh),
        Command::new("yank", "yank [text] - commit url by default", yank),
        Command::new("open", "open [url] - commit url by default", open),
        Command::new("mode", "mode command [prefill..]", set_mode),
        Command::new("status", "status <text..>", status),
        Command::new("help", "help", help),
    ]
}

impl Context<'_> {
    pub fn render(&mut self) -> Result<(), String> {
        self.term
            .terminal
            .draw(|rect| crate::ui::draw(rect, &mut self.app))
            .map_err(|e| format!("Draw failed with: {e}"))?;
        Ok(())
    }
}

fn parse_date(arg: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(arg, DATE_FORMAT)
        .map_err(|e| format!("Invalid date '{arg}' ({e}), expected yyyy-mm-dd"))
}

fn parse_days(args: &[&str]) -> Result<Duration, String> {
    AssertArgs!(args, 1);
    args[0]
        .parse::<i64>()
        .map(Duration::days)
        .map_err(|e| format!("Invalid day count '{}': {e}", args[0]))
}

fn shifted(date: NaiveDate, by: Duration) -> Result<NaiveDate, String> {
    date.checked_add_signed(by)
        .ok_or_else(|| format!("Date out of range: {date} + {} days", by.num_days()))
}

pub fn echo(ctx: &mut Context, args: &[&str]) -> CommandResult {
    ctx.app.status = args.join(" ");
    Ok(())
}

pub fn quit(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.should_quit = true;
    Ok(())
}

pub fn up(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.prev(1);
    Ok(())
}

pub fn down(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.next(1);
    Ok(())
}

pub fn page_up(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.prev(5);
    Ok(())
}

pub fn page_down(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.next(5);
    Ok(())
}

pub fn top(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.top();
    Ok(())
}

pub fn bottom(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.bottom();
    Ok(())
}

pub fn author(ctx: &mut Context, args: &[&str]) -> CommandResult {
    AssertArgs!(args, 1);
    if ctx.app.filter.state().find_contributor(args[0]).is_none() {
        ctx.app.status = format!("Not a contributor: {}", args[0]);
        return Ok(());
    }
    ctx.app.filter.select_contributor(args[0]);
    Ok(())
}

pub fn since(ctx: &mut Context, args: &[&str]) -> CommandResult {
    AssertArgs!(args, 1);
    let date = parse_date(args[0])?;
    ctx.app.filter.set_start_date(date);
    Ok(())
}

pub fn until(ctx: &mut Context, args: &[&str]) -> CommandResult {
    AssertArgs!(args, 1);
    let date = parse_date(args[0])?;
    ctx.app.filter.set_end_date(date);
    Ok(())
}

pub fn shift_since(ctx: &mut Context, args: &[&str]) -> CommandResult {
    let date = shifted(ctx.app.filter.state().start_date(), parse_days(args)?)?;
    ctx.app.filter.set_start_date(date);
    Ok(())
}

pub fn shift_until(ctx: &mut Context, args: &[&str]) -> CommandResult {
    let date = shifted(ctx.app.filter.state().end_date(), parse_days(args)?)?;
    ctx.app.filter.set_end_date(date);
    Ok(())
}

pub fn edit_since(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    let date = ctx.app.filter.state().start_date().format(DATE_FORMAT);
    ctx.app.mode_set(Mode::Command(Some(format!("since {date}"))));
    Ok(())
}

pub fn edit_until(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    let date = ctx.app.filter.state().end_date().format(DATE_FORMAT);
    ctx.app.mode_set(Mode::Command(Some(format!("until {date}"))));
    Ok(())
}

pub fn refresh(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    if ctx.app.filter.refresh().is_none() && ctx.app.filter.state().last_error().is_none() {
        ctx.app.status = "Pick a contributor first".to_owned();
    }
    Ok(())
}

fn url_or_current(ctx: &Context, args: &[&str]) -> Result<String, String> {
    match args {
        [] => ctx
            .app
            .current_url()
            .ok_or_else(|| "No commit selected".to_owned()),
        [url] => Ok((*url).to_owned()),
        _ => Err(format!("Expected at most 1 argument, got {}", args.len())),
    }
}

pub fn yank(ctx: &mut Context, args: &[&str]) -> CommandResult {
    let text = url_or_current(ctx, args)?;
    ctx.clipboard
        .as_mut()
        .ok_or_else(|| "No clipboard provider!".to_owned())?
        .set_contents(text.clone())
        .map_err(|e| format!("Clipboard error: {e}"))?;
    ctx.app.status = format!("yanked: {text}");
    Ok(())
}

pub fn open(ctx: &mut Context, args: &[&str]) -> CommandResult {
    let url = url_or_current(ctx, args)?;
    ctx.term
        .open_url(&url)
        .map_err(|e| format!("Open failed with: {e}"))?;
    ctx.app.status = format!("opened: {url}");
    Ok(())
}

pub fn set_mode(ctx: &mut Context, args: &[&str]) -> CommandResult {
    match args.first().copied() {
        Some("command") => {
            let c = args.iter().skip(1).copied().collect::<Vec<_>>().join(" ");
            ctx.app
                .mode_set(Mode::Command(if c.is_empty() { None } else { Some(c) }));
            Ok(())
        }
        Some(mode) => Err(format!("Unknown mode {}", mode)),
        _ => Err("Mode parameter is required".to_owned()),
    }
}

pub fn status(ctx: &mut Context, args: &[&str]) -> CommandResult {
    ctx.app.status = args.join(" ");
    Ok(())
}

pub fn help(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    ctx.app.status = ctx.help.join(" | ");
    Ok(())
}

struct ContributorItem {
    login: String,
    avatar_url: String,
}

impl SkimItem for ContributorItem {
    fn text(&self) -> Cow<str> {
        Cow::Borrowed(&self.login)
    }

    fn preview(&self, _context: PreviewContext) -> ItemPreview {
        let avatar = if self.avatar_url.is_empty() {
            "no avatar"
        } else {
            self.avatar_url.as_str()
        };
        ItemPreview::Text(format!("{}\n\n{}", self.login, avatar))
    }
}

impl From<&Contributor> for ContributorItem {
    fn from(c: &Contributor) -> Self {
        Self {
            login: c.login.clone(),
            avatar_url: c.avatar_url.clone(),
        }
    }
}

pub fn pick(ctx: &mut Context, _args: &[&str]) -> CommandResult {
    let contributors = ctx.app.filter.state().contributors();
    if contributors.is_empty() {
        return Err("No contributors loaded".to_owned());
    }

    let (tx_item, rx_item) = unbounded::<Arc<dyn SkimItem>>();
    for contributor in contributors {
        tx_item
            .send(Arc::new(ContributorItem::from(contributor)))
            .map_err(|e| format!("Sending contributor to skim failed: {e}"))?;
    }
    drop(tx_item); // so that skim could know when to stop waiting for more items.

    let options = SkimOptionsBuilder::default()
        .preview(Some("")) // preview should be specified to enable preview window
        .no_clear(true)
        .prompt(Some("author> "))
        .build()
        .map_err(|e| format!("Skim options: {e}"))?;

    let mut picked = None;
    ctx.term
        .call(|| {
            if let Some(result) = Skim::run_with(&options, Some(rx_item)) {
                match result.final_event {
                    Event::EvActAccept(_) => {
                        picked = result
                            .selected_items
                            .first()
                            .and_then(|e| (**e).as_any().downcast_ref::<ContributorItem>())
                            .map(|item| item.login.clone());
                    }
                    Event::EvActAbort => {}
                    _ => debug!("Not matched event: {:?}", result.final_event),
                };
            }
        })
        .map_err(|e| format!("Error in call: {e}"))?;
    ctx.term.clear();

    if let Some(login) = picked {
        ctx.app.filter.select_contributor(&login);
    }
    Ok(())
}

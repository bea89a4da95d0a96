use commit_source::{Commit, DATE_FORMAT};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{self, App};

fn commit_card<'a>(commit: &'a Commit) -> ListItem<'a> {
    let author_style = Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD);
    let sha_style = Style::default().fg(Color::Yellow);
    let date_style = Style::default().fg(Color::DarkGray);
    let url_style = Style::default()
        .fg(Color::Blue)
        .add_modifier(Modifier::UNDERLINED);

    ListItem::new(vec![
        Spans::from(vec![
            Span::styled(commit.short_sha(), sha_style),
            Span::raw(" "),
            Span::styled(commit.author_and_repo(), author_style),
            Span::raw(" "),
            Span::styled(
                commit.committed_at.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
                date_style,
            ),
        ]),
        Spans::from(vec![Span::raw("  "), Span::raw(commit.message.as_str())]),
        Spans::from(vec![
            Span::raw("  "),
            Span::styled(commit.url.as_str(), url_style),
        ]),
    ])
}

fn draw_filter_bar<B: Backend>(f: &mut Frame<B>, app: &App, chunk: Rect) {
    let state = app.filter.state();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage(50),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ]
            .as_ref(),
        )
        .split(chunk);

    let contributor = match state.selected_contributor() {
        Some(c) => Span::styled(c.login.as_str(), Style::default().fg(Color::Green)),
        None if state.contributors().is_empty() => {
            Span::styled("-", Style::default().fg(Color::DarkGray))
        }
        None => Span::styled(
            "press 'a' to pick",
            Style::default().fg(Color::DarkGray),
        ),
    };
    let field = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(title)
    };

    f.render_widget(
        Paragraph::new(Spans::from(contributor)).block(field("Contributor")),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(state.start_date().format(DATE_FORMAT).to_string()).block(field("Since")),
        chunks[1],
    );
    f.render_widget(
        Paragraph::new(state.end_date().format(DATE_FORMAT).to_string()).block(field("Until")),
        chunks[2],
    );
}

fn draw_list<B: Backend>(f: &mut Frame<B>, app: &mut App, chunk: Rect) {
    let mut title = vec![Span::raw(app.title())];
    if let Some(spinner) = app.busy_indicator() {
        title.push(Span::raw(" "));
        title.push(Span::styled(
            spinner.to_string(),
            Style::default().fg(Color::Cyan),
        ));
    }
    let block = Block::default()
        .borders(Borders::TOP)
        .border_type(BorderType::Plain)
        .title(Spans::from(title));

    let commits = app.filter.state().commits();
    if commits.is_empty() {
        let text = if app.filter.state().selected_contributor().is_some() {
            "No commits to show."
        } else {
            "Pick a contributor to see their commits."
        };
        let empty = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(empty, chunk);
        return;
    }

    let rows = commits.iter().map(commit_card).collect::<Vec<_>>();
    let list = List::new(rows).block(block).highlight_style(
        Style::default()
            .fg(tui::style::Color::Black)
            .bg(tui::style::Color::Green)
            .add_modifier(Modifier::BOLD),
    );

    f.render_stateful_widget(list, chunk, app.list.state_mut());
}

pub fn draw<B: Backend>(f: &mut Frame<B>, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.size());

    draw_filter_bar(f, app, chunks[0]);
    draw_list(f, app, chunks[1]);

    let status_style = Style::default().add_modifier(Modifier::REVERSED);
    let status_line = match app.filter.state().last_error() {
        Some(err) => Paragraph::new(err.to_string()).style(status_style.fg(Color::Red)),
        None => {
            let count = app.list.len();
            let position = app.list.position().map_or(0, |p| p + 1);
            Paragraph::new(format!(
                "{}/{} | {} contributors | inverted range: {}",
                position,
                count,
                app.filter.state().contributors().len(),
                app.filter.range_policy()
            ))
            .style(status_style)
        }
    };
    f.render_widget(status_line, chunks[2]);

    match app.mode() {
        app::Mode::Normal => {
            let block = Paragraph::new(app.status.as_str());
            f.render_widget(block, chunks[3]);
        }
        app::Mode::Command(_cmd) => {
            f.render_widget(app.textarea.widget(), chunks[3]);
        }
    }
}

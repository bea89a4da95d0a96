use std::time::Duration;

use commit_filter::{FilterHolder, Processed};
use commit_source::Commit;
use log::{info, trace};
use tui::style::Style;
use tui_textarea::TextArea;

use crate::stateful_list::StatefulList;

const SPINNER: [char; 8] = ['⣾', '⣽', '⣻', '⢿', '⡿', '⣟', '⣯', '⣷'];

#[derive(Clone)]
pub enum Mode {
    Normal,
    Command(Option<String>),
}

pub struct App<'a> {
    mode: Mode,
    pub should_quit: bool,
    pub filter: FilterHolder,
    pub list: StatefulList,

    pub status: String,
    pub textarea: TextArea<'a>,

    /// contributor to select as soon as the directory is there
    preselect: Option<String>,
    spinner: usize,
}

fn took(duration: Duration) -> String {
    format!(
        "{}.{}s",
        duration.as_secs(),
        (duration.as_millis() % 1000) / 100
    )
}

impl<'a> App<'a> {
    pub fn new(filter: FilterHolder, preselect: Option<String>) -> App<'a> {
        let mut textarea = TextArea::default();
        textarea.set_cursor_line_style(Style::default());
        App {
            mode: Mode::Normal,
            should_quit: false,
            filter,
            list: StatefulList::default(),
            status: String::new(),
            textarea,
            preselect,
            spinner: 0,
        }
    }

    pub fn initialize(&mut self) {
        if self.filter.initialize() {
            self.status = "Loading contributors..".to_owned();
        }
    }

    // Run though 'select!' in main loop to get data processing running
    pub async fn process(&mut self) {
        let Some(processed) = self.filter.process().await else {
            return;
        };
        match processed {
            Processed::ContributorsLoaded { count, elapsed } => {
                self.status = format!("Loaded {} contributors. Took: {}.", count, took(elapsed));
                if let Some(login) = self.preselect.take() {
                    info!("Preselecting {}", login);
                    self.filter.select_contributor(&login);
                }
            }
            Processed::CommitsLoaded {
                generation,
                count,
                elapsed,
            } => {
                self.list.reset(count);
                self.status = format!("Loaded {} commits. Took: {}.", count, took(elapsed));
                trace!("Showing {}", generation);
            }
            Processed::Failed(error) => {
                self.status = error.to_string();
            }
            Processed::Discarded(_) | Processed::Released(_) => {}
        }
    }

    /// Follows commit changes that come without a load, eg. a rejected range.
    pub fn sync_list(&mut self) {
        let len = self.filter.state().commits().len();
        if len != self.list.len() {
            self.list.reset(len);
        }
    }

    pub fn tick(&mut self) {
        if self.filter.state().is_busy() {
            self.spinner = (self.spinner + 1) % SPINNER.len();
        }
    }

    pub fn busy_indicator(&self) -> Option<char> {
        self.filter
            .state()
            .is_busy()
            .then(|| SPINNER[self.spinner])
    }

    pub fn title(&self) -> String {
        let mut title = "Personal Commits".to_owned();
        if let Some(contributor) = self.filter.state().selected_contributor() {
            title.push_str(" - ");
            title.push_str(&contributor.login);
        }
        title
    }

    pub fn current(&self) -> Option<&Commit> {
        let pos = self.list.position()?;
        self.filter.state().commits().get(pos)
    }

    pub fn current_sha(&self) -> Option<String> {
        self.current().map(|c| c.sha.clone())
    }

    pub fn current_url(&self) -> Option<String> {
        self.current().map(|c| c.url.clone())
    }

    pub fn next(&mut self, count: usize) {
        self.list.next(count);
    }

    pub fn prev(&mut self, count: usize) {
        self.list.prev(count);
    }

    pub fn top(&mut self) {
        self.list.top()
    }

    pub fn bottom(&mut self) {
        self.list.bottom()
    }

    pub fn mode_set(&mut self, mode: Mode) {
        match &mode {
            Mode::Normal => {}
            Mode::Command(cmd) => {
                // Remove input for next command. Do not recreate `self.textarea` instance to keep undo history so that users can
                // restore previous input easily.
                self.textarea.move_cursor(tui_textarea::CursorMove::End);
                self.textarea.delete_line_by_head();
                self.textarea.insert_char(':');
                if let Some(cmd) = cmd {
                    self.textarea.insert_str(cmd);
                }
            }
        }
        self.mode = mode;
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }
}

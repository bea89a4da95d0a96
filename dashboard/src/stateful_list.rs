use tui::widgets::ListState;

/// Cursor over a list whose items are owned elsewhere, only the length is known here.
#[derive(Default)]
pub struct StatefulList {
    state: ListState,
    length: usize,
}

impl StatefulList {
    /// Moves the cursor back to the top of a list with `length` items.
    pub fn reset(&mut self, length: usize) {
        self.length = length;
        self.state = ListState::default();
        self.state.select(if length == 0 { None } else { Some(0) });
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn position(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn next(&mut self, count: usize) {
        if let Some(pos) = self.state.selected() {
            let last = self.length.saturating_sub(1);
            self.state.select(Some(std::cmp::min(pos + count, last)));
        }
    }

    pub fn prev(&mut self, count: usize) {
        if let Some(pos) = self.state.selected() {
            self.state.select(Some(pos.saturating_sub(count)));
        }
    }

    pub fn top(&mut self) {
        if self.length > 0 {
            self.state.select(Some(0));
        }
    }

    pub fn bottom(&mut self) {
        if self.length > 0 {
            self.state.select(Some(self.length - 1));
        }
    }

    pub fn state_mut(&mut self) -> &mut ListState {
        &mut self.state
    }
}

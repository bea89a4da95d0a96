use std::time::Duration;

use crossterm::event::EventStream;
use futures::{pin_mut, select, FutureExt, StreamExt};
use log::debug;
use tokio::time::{interval, Interval, MissedTickBehavior};

pub enum InputEvent {
    Event(crossterm::event::Event),
    /// Periodic wake up, drives the loading spinner
    Tick,
}
pub struct Input {
    event_stream: EventStream,
    ticker: Interval,
}

impl Input {
    pub fn new(tick: Duration) -> Input {
        let mut ticker = interval(tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Input {
            event_stream: EventStream::new(),
            ticker,
        }
    }

    pub async fn next(&mut self) -> InputEvent {
        let event = self.event_stream.next().fuse();
        let tick = self.ticker.tick().fuse();
        pin_mut!(event, tick);
        select! {
            maybe_event = event => {
                match maybe_event {
                    Some(Ok(x)) => InputEvent::Event(x),
                    Some(Err(e)) => { debug!("Error: {:?}\r", e); InputEvent::Tick }
                    None => InputEvent::Tick,
                }
            }
            _ = tick => InputEvent::Tick,
        }
    }
}

use anyhow::{anyhow, Result};
use crossterm::event::{Event as CrosstermEvent, EventStream};
use futures::{FutureExt, StreamExt};
use tokio::sync::mpsc;

use crate::db::SetpointField;

/// Everything the UI loop reacts to besides panel ticks.
#[derive(Debug, Clone)]
pub enum Event {
    Crossterm(CrosstermEvent),
    App(AppEvent),
}

/// Actions produced by key handling and applied by the UI loop.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Quit,
    Home,
    OpenPanel(usize),
    NextPanel,
    PrevPanel,
    OpenSetpoint,
    ReloadSetpoint,
    SaveSetpoint(SetpointField),
    SaveAllSetpoints,
    CommitTitle(String),
}

/// Terminal event handler.
pub struct EventHandler {
    sender: mpsc::UnboundedSender<Event>,
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Creates the channel and spawns the task that reads terminal events.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone());
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// Handler without a terminal reader attached; only [`send`](Self::send) feeds it.
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    pub async fn next(&mut self) -> Result<Event> {
        self.receiver
            .recv()
            .await
            .ok_or_else(|| anyhow!("event channel closed"))
    }

    /// Queue an app event behind any pending terminal events.
    pub fn send(&self, app_event: AppEvent) {
        let _ = self.sender.send(Event::App(app_event));
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

struct EventTask {
    sender: mpsc::UnboundedSender<Event>,
}

impl EventTask {
    fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    async fn run(self) {
        let mut reader = EventStream::new();
        loop {
            let crossterm_event = reader.next().fuse();
            tokio::select! {
                _ = self.sender.closed() => break,
                event = crossterm_event => match event {
                    Some(Ok(evt)) => {
                        let _ = self.sender.send(Event::Crossterm(evt));
                    }
                    Some(Err(err)) => log::warn!("terminal event error: {err}"),
                    None => break,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sent_events_come_back_in_order() {
        let mut events = EventHandler::detached();
        events.send(AppEvent::OpenSetpoint);
        events.send(AppEvent::Quit);

        assert!(matches!(events.next().await.unwrap(), Event::App(AppEvent::OpenSetpoint)));
        assert!(matches!(events.next().await.unwrap(), Event::App(AppEvent::Quit)));
    }
}

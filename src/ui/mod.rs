//! Terminal front end: home menu, one page per chart panel, setpoint form.

mod app;
mod event;
mod render;

pub use app::{App, Page, SetpointForm, Status, StatusKind};
pub use event::{AppEvent, Event, EventHandler};

use anyhow::Result;
use chrono::Local;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;

use crate::{
    chart::TerminalCharts,
    config::PanelConfig,
    db::{Setpoint, SetpointField},
    poll::{Dashboard, RefreshOutcome},
    setpoint::SetpointAccessor,
    settings::SettingsStore,
    source::{ReadingSource, SetpointStore},
};

use super::{
    event::{AppEvent, Event, EventHandler},
    render,
};

const ENABLE_LOGS: bool = true;

use crate::{log_error, log_info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Panel(usize),
    Setpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }
}

/// Text-field state of the setpoint page.
#[derive(Debug, Default)]
pub struct SetpointForm {
    pub loaded: Option<Setpoint>,
    pub temperature: String,
    pub humidity: String,
    pub editing: Option<SetpointField>,
}

impl SetpointForm {
    fn fill(&mut self, setpoint: Option<Setpoint>) {
        let text = |field: SetpointField| {
            setpoint
                .as_ref()
                .map(|s: &Setpoint| s.get(field).to_string())
                .unwrap_or_default()
        };
        self.temperature = text(SetpointField::Temperature);
        self.humidity = text(SetpointField::Humidity);
        self.loaded = setpoint;
        self.editing = None;
    }

    pub fn input(&self, field: SetpointField) -> &str {
        match field {
            SetpointField::Temperature => &self.temperature,
            SetpointField::Humidity => &self.humidity,
        }
    }

    /// Whether the text differs from what was last loaded or saved.
    pub fn is_modified(&self, field: SetpointField) -> bool {
        let input = self.input(field).trim();
        match &self.loaded {
            Some(setpoint) => input != setpoint.get(field).to_string(),
            None => !input.is_empty(),
        }
    }

    fn input_mut(&mut self, field: SetpointField) -> &mut String {
        match field {
            SetpointField::Temperature => &mut self.temperature,
            SetpointField::Humidity => &mut self.humidity,
        }
    }
}

pub struct App<S> {
    pub running: bool,
    pub page: Page,
    pub dashboard: Dashboard<S, TerminalCharts>,
    pub setpoints: SetpointAccessor<S>,
    pub settings: SettingsStore,
    pub form: SetpointForm,
    /// Some while the title is being edited on the home page.
    pub title_input: Option<String>,
    pub status: Option<Status>,
}

impl<S> App<S>
where
    S: ReadingSource + SetpointStore + Clone,
{
    pub fn new(store: S, panels: Vec<PanelConfig>, settings: SettingsStore) -> Self {
        Self {
            running: true,
            page: Page::Home,
            dashboard: Dashboard::new(store.clone(), TerminalCharts::new(), panels),
            setpoints: SetpointAccessor::new(store),
            settings,
            form: SetpointForm::default(),
            title_input: None,
            status: None,
        }
    }

    /// Run the UI loop until the user quits or the terminal fails, then
    /// persist the settings either way.
    pub async fn run(mut self, mut terminal: DefaultTerminal, mut events: EventHandler) -> Result<()> {
        let result = self.event_loop(&mut terminal, &mut events).await;
        self.shutdown();
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut DefaultTerminal,
        events: &mut EventHandler,
    ) -> Result<()> {
        while self.running {
            terminal.draw(|frame| render::draw(frame, &*self))?;

            tokio::select! {
                event = events.next() => match event? {
                    Event::Crossterm(CrosstermEvent::Key(key)) => {
                        if let Some(action) = self.handle_key_event(key) {
                            events.send(action);
                        }
                    }
                    Event::Crossterm(_) => {}
                    Event::App(action) => self.apply(action).await,
                },
                index = self.dashboard.next_tick() => {
                    if let Some(outcome) = self.dashboard.refresh(index).await {
                        self.on_refresh(index, outcome);
                    }
                }
            }
        }
        Ok(())
    }

    /// Stop every panel timer and write the settings file.
    pub fn shutdown(&mut self) {
        self.dashboard.leave_all();
        if let Err(err) = self.settings.persist() {
            log_error!("failed to save dashboard settings: {err:#}");
        }
    }

    /// Translate a key press into an action. Text editing is handled in place.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
        {
            return Some(AppEvent::Quit);
        }

        if let Some(buffer) = self.title_input.as_mut() {
            return match key.code {
                KeyCode::Enter => self.title_input.take().map(AppEvent::CommitTitle),
                KeyCode::Esc => {
                    self.title_input = None;
                    None
                }
                KeyCode::Backspace => {
                    buffer.pop();
                    None
                }
                KeyCode::Char(c) => {
                    buffer.push(c);
                    None
                }
                _ => None,
            };
        }

        if let Some(field) = self.form.editing {
            return match key.code {
                KeyCode::Enter => {
                    self.form.editing = None;
                    Some(AppEvent::SaveSetpoint(field))
                }
                KeyCode::Esc => {
                    let loaded = self.form.loaded.take();
                    self.form.fill(loaded);
                    None
                }
                KeyCode::Backspace => {
                    self.form.input_mut(field).pop();
                    None
                }
                KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+') => {
                    self.form.input_mut(field).push(c);
                    None
                }
                _ => None,
            };
        }

        match self.page {
            Page::Home => match key.code {
                KeyCode::Enter | KeyCode::Char('g') => Some(AppEvent::OpenPanel(0)),
                KeyCode::Char(c @ '1'..='9') => {
                    let index = c as usize - '1' as usize;
                    Some(AppEvent::OpenPanel(index))
                }
                KeyCode::Char('s') => Some(AppEvent::OpenSetpoint),
                KeyCode::Char('t') => {
                    self.title_input = Some(self.settings.title());
                    None
                }
                KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Quit),
                _ => None,
            },
            Page::Panel(_) => match key.code {
                KeyCode::Esc | KeyCode::Char('b') => Some(AppEvent::Home),
                KeyCode::Right | KeyCode::Char('l') => Some(AppEvent::NextPanel),
                KeyCode::Left | KeyCode::Char('h') => Some(AppEvent::PrevPanel),
                KeyCode::Char('q') => Some(AppEvent::Quit),
                _ => None,
            },
            Page::Setpoint => match key.code {
                KeyCode::Char('e') => {
                    self.form.editing = Some(SetpointField::Temperature);
                    None
                }
                KeyCode::Char('h') => {
                    self.form.editing = Some(SetpointField::Humidity);
                    None
                }
                KeyCode::Enter => Some(AppEvent::SaveAllSetpoints),
                KeyCode::Char('r') => Some(AppEvent::ReloadSetpoint),
                KeyCode::Esc | KeyCode::Char('b') => Some(AppEvent::Home),
                KeyCode::Char('q') => Some(AppEvent::Quit),
                _ => None,
            },
        }
    }

    pub async fn apply(&mut self, action: AppEvent) {
        match action {
            AppEvent::Quit => self.running = false,
            AppEvent::Home => self.show(Page::Home).await,
            AppEvent::OpenPanel(index) => {
                if self.dashboard.panel(index).is_some() {
                    self.show(Page::Panel(index)).await;
                } else {
                    self.status = Some(Status::error(format!("No panel {}", index + 1)));
                }
            }
            AppEvent::NextPanel | AppEvent::PrevPanel => {
                if let Page::Panel(current) = self.page {
                    let count = self.dashboard.panels().len();
                    let next = if action == AppEvent::NextPanel {
                        (current + 1) % count
                    } else {
                        (current + count - 1) % count
                    };
                    self.show(Page::Panel(next)).await;
                }
            }
            AppEvent::OpenSetpoint => self.show(Page::Setpoint).await,
            AppEvent::ReloadSetpoint => self.reload_setpoint().await,
            AppEvent::SaveSetpoint(field) => self.save_setpoint(field).await,
            AppEvent::SaveAllSetpoints => {
                self.form.editing = None;
                let modified: Vec<_> = [SetpointField::Temperature, SetpointField::Humidity]
                    .into_iter()
                    .filter(|&field| self.form.is_modified(field))
                    .collect();
                if modified.is_empty() {
                    self.status = Some(Status::info("No changes to save"));
                }
                for field in modified {
                    self.save_setpoint(field).await;
                    if matches!(&self.status, Some(status) if status.kind == StatusKind::Error) {
                        break;
                    }
                }
            }
            AppEvent::CommitTitle(title) => {
                self.settings.set_title(&title);
                log_info!("dashboard title set to '{}'", self.settings.title());
                self.status = Some(Status::info("Title updated"));
            }
        }
    }

    /// Switch pages, stopping the old panel's timer and starting the new one's.
    async fn show(&mut self, page: Page) {
        if page == self.page {
            return;
        }
        if let Page::Panel(index) = self.page {
            self.dashboard.leave(index);
        }
        self.form.editing = None;
        self.title_input = None;
        self.page = page;

        match page {
            Page::Panel(index) => {
                if let Some(outcome) = self.dashboard.enter(index).await {
                    self.on_refresh(index, outcome);
                }
            }
            Page::Setpoint => self.reload_setpoint().await,
            Page::Home => {}
        }
    }

    fn on_refresh(&mut self, index: usize, outcome: RefreshOutcome) {
        let title = self
            .dashboard
            .panel(index)
            .map(|panel| panel.config().title.clone())
            .unwrap_or_default();

        self.status = Some(match outcome {
            RefreshOutcome::Redrawn { points } => Status::info(format!(
                "{title}: {points} readings at {}",
                Local::now().format("%H:%M:%S")
            )),
            RefreshOutcome::Failed { reason } => {
                Status::error(format!("{title}: refresh failed: {reason}"))
            }
        });
    }

    async fn reload_setpoint(&mut self) {
        match self.setpoints.load().await {
            Ok(Some(setpoint)) => {
                self.form.fill(Some(setpoint));
                self.status = Some(Status::info("Setpoint loaded"));
            }
            Ok(None) => {
                self.form.fill(None);
                self.status = Some(Status::error("Setpoint has not been initialized"));
            }
            Err(err) => {
                self.status = Some(Status::error(format!("Failed to load setpoint: {err:#}")));
            }
        }
    }

    // The typed text stays in the form whether or not the save succeeds.
    async fn save_setpoint(&mut self, field: SetpointField) {
        let input = self.form.input(field).to_string();
        match self.setpoints.save_input(field, &input).await {
            Ok(value) => {
                if let Some(loaded) = self.form.loaded.as_mut() {
                    match field {
                        SetpointField::Temperature => loaded.target_temperature = value,
                        SetpointField::Humidity => loaded.target_humidity = value,
                    }
                }
                self.status = Some(Status::info(format!(
                    "{field} setpoint saved: {value}{}",
                    field.unit()
                )));
            }
            Err(err) => {
                self.status = Some(Status::error(format!("{field} not saved: {err:#}")));
            }
        }
    }
}

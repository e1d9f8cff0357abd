use crate::config::Config;
use crate::i18n::{Language, Translations, Translator};
use crate::maintenance::{Catalog, CommandResult, CommandSet, Operation, ShellRunner, TaskEvent, TaskHandle};
use std::sync::Arc;

/// Log lines kept for the running view; older lines are dropped.
const MAX_LOG_LINES: usize = 5000;

// ========== Enums ==========

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Dashboard,
    Running,
    Result,
}

// ========== Sub-states ==========

/// Progress of the operation currently in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct RunState {
    pub operation: Operation,
    pub fraction: f64,
    /// Latest progress message (untranslated key or raw output line).
    pub message: String,
    pub lines: Vec<String>,
    pub scroll: usize,
    /// Whether the scroll position follows new output.
    pub follow: bool,
    pub cancelling: bool,
}

impl RunState {
    pub fn new(operation: Operation) -> Self {
        Self {
            operation,
            fraction: 0.0,
            message: operation.status_key().to_string(),
            lines: Vec::new(),
            scroll: 0,
            follow: true,
            cancelling: false,
        }
    }

    pub fn add_line(&mut self, line: String) {
        self.lines.push(line);
        if self.lines.len() > MAX_LOG_LINES {
            let excess = self.lines.len() - MAX_LOG_LINES;
            self.lines.drain(..excess);
        }
        if self.follow {
            self.scroll = self.lines.len().saturating_sub(1);
        }
    }
}

/// Finished operation waiting to be dismissed.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultState {
    pub operation: Operation,
    pub result: CommandResult,
    pub scroll: usize,
}

/// Modal message over the dashboard, dismissed by any key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub body: String,
}

// ========== App ==========

pub struct App {
    pub config: Config,
    pub translations: Translations,
    pub catalog: Arc<Catalog<ShellRunner>>,
    pub mode: AppMode,
    pub selected: usize,
    pub show_about: bool,
    pub notice: Option<Notice>,
    pub run: Option<RunState>,
    pub result: Option<ResultState>,
    pub task: Option<TaskHandle>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let commands = CommandSet::new(config.elevation.program());
        Self {
            translations: Translations::new(config.language()),
            catalog: Arc::new(Catalog::new(ShellRunner, commands)),
            config,
            mode: AppMode::Dashboard,
            selected: 0,
            show_about: false,
            notice: None,
            run: None,
            result: None,
            task: None,
            should_quit: false,
        }
    }

    pub fn tr(&self, key: &str) -> String {
        self.translations.translate(key)
    }

    pub fn selected_operation(&self) -> Operation {
        Operation::ALL[self.selected.min(Operation::ALL.len() - 1)]
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Operation::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = (self.selected + Operation::ALL.len() - 1) % Operation::ALL.len();
    }

    pub fn is_busy(&self) -> bool {
        self.task.is_some()
    }

    /// Switch to the running view for a freshly spawned task.
    pub fn begin_run(&mut self, handle: TaskHandle) {
        self.run = Some(RunState::new(handle.operation()));
        self.result = None;
        self.task = Some(handle);
        self.mode = AppMode::Running;
    }

    pub fn request_cancel(&mut self) {
        if let Some(task) = &self.task {
            task.cancel();
            if let Some(run) = &mut self.run {
                run.cancelling = true;
            }
        }
    }

    pub fn apply_task_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Progress { fraction, message } => {
                if let Some(run) = &mut self.run {
                    run.fraction = fraction;
                    run.message = message.clone();
                    run.add_line(message);
                }
            }
            TaskEvent::Finished(result) => {
                let operation = self
                    .task
                    .take()
                    .map(|t| t.operation())
                    .or_else(|| self.run.as_ref().map(|r| r.operation))
                    .unwrap_or_else(|| self.selected_operation());
                self.run = None;
                self.result = Some(ResultState {
                    operation,
                    result,
                    scroll: 0,
                });
                self.mode = AppMode::Result;
            }
        }
    }

    pub fn dismiss_result(&mut self) {
        self.result = None;
        self.mode = AppMode::Dashboard;
    }

    /// Switch to the next language, persist it and show the confirmation notice.
    pub fn cycle_language(&mut self) {
        let language = self.translations.language().next();
        self.set_language(language);
    }

    pub fn set_language(&mut self, language: Language) {
        self.translations = Translations::new(language);
        self.config.language = Some(language);
        if let Err(e) = self.config.save() {
            log::error!("failed to save config: {:#}", e);
        }
        self.notice = Some(Notice {
            title: self.tr("Language Changed"),
            body: self.tr("Language has been updated."),
        });
    }

    /// Report a failed elevation check as a failed result.
    pub fn show_auth_failure(&mut self, operation: Operation, detail: Option<String>) {
        let message = match detail {
            Some(detail) => format!("Error: {}", detail),
            None => "Authentication failed".to_string(),
        };
        self.result = Some(ResultState {
            operation,
            result: CommandResult::failure(message),
            scroll: 0,
        });
        self.mode = AppMode::Result;
    }

    pub fn scroll_up(&mut self, amount: usize) {
        match self.mode {
            AppMode::Running => {
                if let Some(run) = &mut self.run {
                    run.scroll = run.scroll.saturating_sub(amount);
                    run.follow = false;
                }
            }
            AppMode::Result => {
                if let Some(result) = &mut self.result {
                    result.scroll = result.scroll.saturating_sub(amount);
                }
            }
            AppMode::Dashboard => {}
        }
    }

    pub fn scroll_down(&mut self, amount: usize, visible_height: usize) {
        match self.mode {
            AppMode::Running => {
                if let Some(run) = &mut self.run {
                    let max_scroll = run.lines.len().saturating_sub(visible_height);
                    run.scroll = (run.scroll + amount).min(max_scroll);
                    run.follow = run.scroll >= max_scroll;
                }
            }
            AppMode::Result => {
                if let Some(result) = &mut self.result {
                    result.scroll += amount;
                }
            }
            AppMode::Dashboard => {}
        }
    }
}

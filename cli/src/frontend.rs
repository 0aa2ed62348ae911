//! Terminal front end: maps commands onto `App` and prints its state.
//!
//! Owns the pieces of UI state the controller does not: per-row edit
//! buffers, inline form errors and a one-shot notice line.

use std::fmt;
use std::time::Instant;

use todo_core::{
    render, validate_title, ApiError, App, Completion, Dispatch, EditBuffers, Field, FieldErrors,
    HttpResponse, RequestId, SaveOutcome, Task,
};

use crate::command::{Command, CommandError, HELP};

pub const SIGNED_OUT_STATUS: &str = "Not signed in. Use `register` or `login`.";
pub const LOADING_STATUS: &str = "Loading tasks...";

/// What the event loop should do after a command.
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(Vec<Dispatch>),
    Quit,
}

#[derive(Debug)]
pub struct Frontend {
    app: App,
    edits: EditBuffers,
    auth_errors: FieldErrors,
    submitted_email: Option<String>,
    title_error: Option<&'static str>,
    notice: Option<String>,
}

impl Frontend {
    pub fn new(app: App) -> Self {
        Self {
            app,
            edits: EditBuffers::new(),
            auth_errors: FieldErrors::default(),
            submitted_email: None,
            title_error: None,
            notice: None,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn toast_deadline(&self) -> Option<Instant> {
        self.app.toast_deadline()
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.app.tick(now)
    }

    pub fn reject(&mut self, err: CommandError) {
        self.notice = Some(err.to_string());
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        self.notice = None;
        let dispatch = match command {
            Command::Quit => return Flow::Quit,
            Command::Register { email, password } => self.authenticate(&email, &password, true),
            Command::Login { email, password } => self.authenticate(&email, &password, false),
            Command::Logout => {
                if self.app.is_signed_in() {
                    self.app.logout();
                    self.edits.clear();
                    self.title_error = None;
                } else {
                    self.notice = Some("not signed in".to_string());
                }
                None
            }
            Command::Add(title) => match validate_title(&title) {
                Ok(title) => {
                    self.title_error = None;
                    self.app.create_task(&title)
                }
                Err(errors) => {
                    self.title_error = errors.get(Field::Title);
                    None
                }
            },
            Command::Toggle(row) => self
                .task_at(row)
                .and_then(|task| self.app.toggle_task(&task.id)),
            Command::Edit(row) => {
                if let Some(task) = self.task_at(row) {
                    self.edits.begin(&task);
                }
                None
            }
            Command::Draft(row, text) => {
                if let Some(task) = self.task_at(row) {
                    if !self.edits.set_draft(&task.id, text) {
                        self.notice = Some(format!("task {row} is not being edited"));
                    }
                }
                None
            }
            Command::Save(row) => match self.task_at(row).map(|task| self.edits.save(&task.id)) {
                Some(SaveOutcome::Rename { id, title }) => self.app.rename_task(&id, &title),
                Some(SaveOutcome::NotEditing) => {
                    self.notice = Some(format!("task {row} is not being edited"));
                    None
                }
                Some(SaveOutcome::Reverted) | None => None,
            },
            Command::Cancel(row) => {
                if let Some(task) = self.task_at(row) {
                    if !self.edits.cancel(&task.id) {
                        self.notice = Some(format!("task {row} is not being edited"));
                    }
                }
                None
            }
            Command::Delete(row) => self
                .task_at(row)
                .and_then(|task| self.app.delete_task(&task.id)),
            Command::List => {
                if !self.app.is_signed_in() {
                    self.notice = Some("sign in to see your tasks".to_string());
                }
                self.app.load_tasks()
            }
            Command::Dismiss => {
                self.app.dismiss_toast();
                None
            }
            Command::Help => {
                self.notice = Some(HELP.to_string());
                None
            }
        };
        Flow::Continue(dispatch.into_iter().collect())
    }

    /// Feed a finished request back into the app. Returns follow-up requests.
    pub fn on_completion(&mut self, id: RequestId, outcome: Result<HttpResponse, ApiError>) -> Vec<Dispatch> {
        let follow_up = match self.app.complete(id, outcome) {
            Completion::Authenticated(load) => {
                self.auth_errors = FieldErrors::default();
                self.submitted_email = None;
                vec![load]
            }
            Completion::AuthRejected(err) => {
                self.auth_errors = FieldErrors::default();
                let email = self.submitted_email.take().unwrap_or_default();
                self.notice = Some(format!("could not sign in as {email}: {}", err.message()));
                Vec::new()
            }
            Completion::Applied | Completion::Failed(_) | Completion::Discarded => Vec::new(),
        };
        self.edits.retain(self.app.tasks());
        follow_up
    }

    fn authenticate(&mut self, email: &str, password: &str, register: bool) -> Option<Dispatch> {
        if let Some(current) = self.app.session() {
            self.notice = Some(format!("already signed in as {current}; logout first"));
            return None;
        }
        let submitted = if register {
            self.app.register(email, password)
        } else {
            self.app.login(email, password)
        };
        match submitted {
            Ok(dispatch) => {
                self.auth_errors = FieldErrors::default();
                self.submitted_email = Some(email.trim().to_lowercase());
                dispatch
            }
            Err(errors) => {
                self.auth_errors = errors;
                None
            }
        }
    }

    fn task_at(&mut self, row: usize) -> Option<Task> {
        let task = row
            .checked_sub(1)
            .and_then(|index| self.app.tasks().get(index))
            .cloned();
        if task.is_none() {
            self.notice = Some(format!("no task {row}"));
        }
        task
    }
}

impl fmt::Display for Frontend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(toast) = self.app.toast() {
            writeln!(f, "{toast}")?;
        }
        match self.app.session() {
            None => {
                writeln!(f, "{SIGNED_OUT_STATUS}")?;
                for (field, message) in self.auth_errors.iter() {
                    writeln!(f, "  {}: {message}", field.as_str())?;
                }
            }
            Some(email) => {
                writeln!(f, "Signed in as {email}")?;
                if let Some(message) = self.title_error {
                    writeln!(f, "  {}: {message}", Field::Title.as_str())?;
                }
                if self.app.is_loading() {
                    writeln!(f, "{LOADING_STATUS}")?;
                } else {
                    write!(f, "{}", render(self.app.tasks(), &self.edits))?;
                }
            }
        }
        if let Some(notice) = &self.notice {
            writeln!(f, "{notice}")?;
        }
        Ok(())
    }
}

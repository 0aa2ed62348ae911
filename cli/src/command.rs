//! Parsing of the line-oriented commands typed at the prompt.

use thiserror::Error;

pub const HELP: &str = "\
commands:
  register <email> <password>   create an account and sign in
  login <email> <password>      sign in
  logout                        sign out
  add <title>                   create a task
  toggle <n>                    flip task n between done and pending
  edit <n>                      start editing task n
  draft <n> <text>              replace the edit buffer of task n
  save <n>                      save the edit of task n
  cancel <n>                    discard the edit of task n
  delete <n>                    delete task n
  list                          reload tasks from the server
  dismiss                       close the notification
  help                          show this text
  quit                          exit";

/// One user action. Rows are 1-based positions in the rendered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register { email: String, password: String },
    Login { email: String, password: String },
    Logout,
    Add(String),
    Toggle(usize),
    Edit(usize),
    Draft(usize, String),
    Save(usize),
    Cancel(usize),
    Delete(usize),
    List,
    Dismiss,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command `{0}` (try `help`)")]
    Unknown(String),

    #[error("`{command}` needs {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("`{0}` is not a task number")]
    InvalidRow(String),
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim_start();
    if line.trim().is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "register" => {
            let (email, password) = credentials("register", rest)?;
            Command::Register { email, password }
        }
        "login" => {
            let (email, password) = credentials("login", rest)?;
            Command::Login { email, password }
        }
        "logout" => Command::Logout,
        // The title is passed through untrimmed; the task form validates it.
        "add" => Command::Add(rest.to_string()),
        "toggle" => Command::Toggle(row("toggle", rest)?),
        "edit" => Command::Edit(row("edit", rest)?),
        "draft" => {
            let rest = rest.trim_start();
            let (n, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            Command::Draft(row("draft", n)?, text.to_string())
        }
        "save" => Command::Save(row("save", rest)?),
        "cancel" => Command::Cancel(row("cancel", rest)?),
        "delete" | "rm" => Command::Delete(row("delete", rest)?),
        "list" | "ls" => Command::List,
        "dismiss" => Command::Dismiss,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

fn credentials(command: &'static str, rest: &str) -> Result<(String, String), CommandError> {
    let mut parts = rest.split_whitespace();
    let email = parts.next().ok_or(CommandError::MissingArgument {
        command,
        argument: "an email",
    })?;
    let password = parts.next().ok_or(CommandError::MissingArgument {
        command,
        argument: "a password",
    })?;
    Ok((email.to_string(), password.to_string()))
}

fn row(command: &'static str, rest: &str) -> Result<usize, CommandError> {
    let raw = rest.trim();
    if raw.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "a task number",
        });
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CommandError::InvalidRow(raw.to_string())),
    }
}

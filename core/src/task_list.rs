//! Presentation model for the task list.
//!
//! # Design
//! `Task` stays pure data. Per-row edit mode lives in [`EditBuffers`], a
//! transient map keyed by task id that belongs to whoever renders the list.
//! [`render`] combines both into a `TaskListView` the front end prints.

use std::collections::HashMap;
use std::fmt;

use crate::types::Task;

pub const EMPTY_LIST_STATUS: &str = "No tasks yet.";

/// Result of pressing save on a row in edit mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Invoke rename with the trimmed draft.
    Rename { id: String, title: String },
    /// The draft was blank; edit mode closed without a rename.
    Reverted,
    /// The row was not in edit mode.
    NotEditing,
}

/// Draft text for rows currently in edit mode.
#[derive(Debug, Clone, Default)]
pub struct EditBuffers {
    drafts: HashMap<String, String>,
}

impl EditBuffers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter edit mode, seeding the draft with the current title.
    pub fn begin(&mut self, task: &Task) {
        self.drafts.insert(task.id.clone(), task.title.clone());
    }

    /// Replace the draft. Ignored for rows not in edit mode.
    pub fn set_draft(&mut self, id: &str, text: impl Into<String>) -> bool {
        match self.drafts.get_mut(id) {
            Some(draft) => {
                *draft = text.into();
                true
            }
            None => false,
        }
    }

    pub fn draft(&self, id: &str) -> Option<&str> {
        self.drafts.get(id).map(String::as_str)
    }

    pub fn is_editing(&self, id: &str) -> bool {
        self.drafts.contains_key(id)
    }

    /// Leave edit mode. A non-blank draft becomes a rename request.
    pub fn save(&mut self, id: &str) -> SaveOutcome {
        let Some(draft) = self.drafts.remove(id) else {
            return SaveOutcome::NotEditing;
        };
        let trimmed = draft.trim();
        if trimmed.is_empty() {
            SaveOutcome::Reverted
        } else {
            SaveOutcome::Rename {
                id: id.to_string(),
                title: trimmed.to_string(),
            }
        }
    }

    /// Leave edit mode and discard the draft.
    pub fn cancel(&mut self, id: &str) -> bool {
        self.drafts.remove(id).is_some()
    }

    /// Forget drafts of tasks that are no longer listed.
    pub fn retain(&mut self, tasks: &[Task]) {
        self.drafts
            .retain(|id, _| tasks.iter().any(|task| &task.id == id));
    }

    pub fn clear(&mut self) {
        self.drafts.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
    Save,
    Cancel,
}

impl RowAction {
    pub fn label(self) -> &'static str {
        match self {
            RowAction::Edit => "edit",
            RowAction::Delete => "delete",
            RowAction::Save => "save",
            RowAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowContent {
    Title(String),
    Editing(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: String,
    pub checked: bool,
    pub content: RowContent,
    pub actions: [RowAction; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
    Empty,
    Rows(Vec<RowView>),
}

pub fn render(tasks: &[Task], edits: &EditBuffers) -> TaskListView {
    if tasks.is_empty() {
        return TaskListView::Empty;
    }
    let rows = tasks
        .iter()
        .map(|task| match edits.draft(&task.id) {
            Some(draft) => RowView {
                id: task.id.clone(),
                checked: task.completed,
                content: RowContent::Editing(draft.to_string()),
                actions: [RowAction::Save, RowAction::Cancel],
            },
            None => RowView {
                id: task.id.clone(),
                checked: task.completed,
                content: RowContent::Title(task.title.clone()),
                actions: [RowAction::Edit, RowAction::Delete],
            },
        })
        .collect();
    TaskListView::Rows(rows)
}

impl fmt::Display for TaskListView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = match self {
            TaskListView::Empty => return writeln!(f, "{EMPTY_LIST_STATUS}"),
            TaskListView::Rows(rows) => rows,
        };
        for (index, row) in rows.iter().enumerate() {
            let mark = if row.checked { 'x' } else { ' ' };
            let text = match &row.content {
                RowContent::Title(title) => title.clone(),
                RowContent::Editing(draft) => format!("> {draft}_"),
            };
            let [first, second] = row.actions;
            writeln!(
                f,
                "{:>3}. [{mark}] {text}  ({}|{})",
                index + 1,
                first.label(),
                second.label()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, title: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            completed,
        }
    }

    #[test]
    fn empty_list_renders_status() {
        let view = render(&[], &EditBuffers::new());
        assert_eq!(view, TaskListView::Empty);
        assert_eq!(view.to_string(), "No tasks yet.\n");
    }

    #[test]
    fn rows_follow_task_order_and_flags() {
        let tasks = vec![task("a", "Estudiar", false), task("b", "Correr", true)];
        let TaskListView::Rows(rows) = render(&tasks, &EditBuffers::new()) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].content, RowContent::Title("Estudiar".to_string()));
        assert!(!rows[0].checked);
        assert!(rows[1].checked);
        assert_eq!(rows[1].actions, [RowAction::Edit, RowAction::Delete]);
    }

    #[test]
    fn begin_seeds_draft_with_title() {
        let original = task("a", "Original", false);
        let mut edits = EditBuffers::new();
        edits.begin(&original);

        let TaskListView::Rows(rows) = render(&[original], &edits) else {
            panic!("expected rows");
        };
        assert_eq!(rows[0].content, RowContent::Editing("Original".to_string()));
        assert_eq!(rows[0].actions, [RowAction::Save, RowAction::Cancel]);
    }

    #[test]
    fn save_with_text_requests_trimmed_rename() {
        let mut edits = EditBuffers::new();
        edits.begin(&task("a", "Original", false));
        assert!(edits.set_draft("a", "  Editada "));

        assert_eq!(
            edits.save("a"),
            SaveOutcome::Rename {
                id: "a".to_string(),
                title: "Editada".to_string()
            }
        );
        assert!(!edits.is_editing("a"));
    }

    #[test]
    fn save_with_unchanged_title_still_renames() {
        let mut edits = EditBuffers::new();
        edits.begin(&task("a", "Same", false));
        assert!(matches!(edits.save("a"), SaveOutcome::Rename { .. }));
    }

    #[test]
    fn save_with_blank_draft_reverts() {
        let mut edits = EditBuffers::new();
        edits.begin(&task("a", "Persistente", false));
        edits.set_draft("a", "   ");

        assert_eq!(edits.save("a"), SaveOutcome::Reverted);
        assert!(!edits.is_editing("a"));
        assert_eq!(edits.save("a"), SaveOutcome::NotEditing);
    }

    #[test]
    fn cancel_discards_draft() {
        let mut edits = EditBuffers::new();
        edits.begin(&task("a", "Keep", false));
        edits.set_draft("a", "Changed");

        assert!(edits.cancel("a"));
        assert!(edits.draft("a").is_none());
        assert!(!edits.cancel("a"));
    }

    #[test]
    fn set_draft_requires_edit_mode() {
        let mut edits = EditBuffers::new();
        assert!(!edits.set_draft("missing", "x"));
    }

    #[test]
    fn retain_drops_drafts_of_removed_tasks() {
        let mut edits = EditBuffers::new();
        edits.begin(&task("a", "A", false));
        edits.begin(&task("b", "B", false));

        edits.retain(&[task("b", "B", false)]);
        assert!(!edits.is_editing("a"));
        assert!(edits.is_editing("b"));
    }

    #[test]
    fn display_numbers_rows_from_one() {
        let tasks = vec![task("a", "Comprar pan", false), task("b", "Done", true)];
        let mut edits = EditBuffers::new();
        edits.begin(&tasks[1]);
        let text = render(&tasks, &edits).to_string();
        assert_eq!(
            text,
            "  1. [ ] Comprar pan  (edit|delete)\n  2. [x] > Done_  (save|cancel)\n"
        );
    }
}

//! Headless binding between a todo list and its rows.
//!
//! # Design
//! `TodoListAdapter` owns the current item list and hands out `TodoRow`
//! bindings. A row snapshots its item when it is bound and keeps its own
//! displayed checked state; user interaction on a row reports the snapshot
//! id, never a position looked up again at callback time. Replacing the list
//! with `update_items` therefore cannot redirect a callback from an
//! already-bound row to a different item.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single todo entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: Uuid,
    pub task: String,
    #[serde(default)]
    pub checked: bool,
}

/// Receives user edits coming from bound rows.
pub trait ItemUpdater: Send + Sync {
    fn update_checked(&self, id: Uuid, checked: bool);

    fn update_task(&self, id: Uuid, current_task: &str);
}

pub struct TodoListAdapter {
    items: Vec<TodoItem>,
    updater: Arc<dyn ItemUpdater>,
    generation: u64,
}

impl TodoListAdapter {
    pub fn new(items: Vec<TodoItem>, updater: Arc<dyn ItemUpdater>) -> Self {
        Self {
            items,
            updater,
            generation: 0,
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Bumped on every `update_items`; rows bound under an older generation
    /// should be rebound to show fresh data.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Bind the row at `position`, or `None` past the end of the list.
    pub fn bind(&self, position: usize) -> Option<TodoRow> {
        let item = self.items.get(position)?.clone();
        Some(TodoRow {
            checked: item.checked,
            item,
            generation: self.generation,
            updater: Arc::clone(&self.updater),
        })
    }

    pub fn update_items(&mut self, items: Vec<TodoItem>) {
        self.items = items;
        self.generation += 1;
    }
}

/// One bound row: the item as it was at bind time plus what is on screen.
pub struct TodoRow {
    item: TodoItem,
    checked: bool,
    generation: u64,
    updater: Arc<dyn ItemUpdater>,
}

impl TodoRow {
    pub fn id(&self) -> Uuid {
        self.item.id
    }

    pub fn task_text(&self) -> &str {
        &self.item.task
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Checkbox changed. Notifies the updater only on an actual change.
    pub fn set_checked(&mut self, checked: bool) {
        if self.checked == checked {
            return;
        }
        self.checked = checked;
        self.updater.update_checked(self.item.id, checked);
    }

    /// Tapping the row toggles its checkbox.
    pub fn click(&mut self) {
        self.set_checked(!self.checked);
    }

    /// Long press asks to edit the task text. Always consumes the event.
    pub fn long_click(&self) -> bool {
        self.updater.update_task(self.item.id, &self.item.task);
        true
    }
}

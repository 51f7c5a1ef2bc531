//! Phase kanban board: columns, task placement, and the per-phase column
//! order the user arranges by dragging.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::{PhaseDetail, Task, TaskStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnId {
    OnHold,
    InProgress,
    Completed,
}

impl ColumnId {
    pub const ALL: [ColumnId; 3] = [ColumnId::OnHold, ColumnId::InProgress, ColumnId::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnHold => "onHold",
            Self::InProgress => "inProgress",
            Self::Completed => "completed",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::OnHold => "On hold",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self {
            Self::OnHold => TaskStatus::OnHold,
            Self::InProgress => TaskStatus::InProgress,
            Self::Completed => TaskStatus::Done,
        }
    }

    pub fn for_status(status: TaskStatus) -> Self {
        match status {
            TaskStatus::OnHold => Self::OnHold,
            TaskStatus::InProgress => Self::InProgress,
            TaskStatus::Done => Self::Completed,
        }
    }
}

impl std::str::FromStr for ColumnId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "onhold" => Ok(Self::OnHold),
            "inprogress" => Ok(Self::InProgress),
            "completed" | "done" => Ok(Self::Completed),
            _ => anyhow::bail!(
                "Invalid column '{}'. Valid values: onHold, inProgress, completed",
                s
            ),
        }
    }
}

pub fn default_order() -> Vec<ColumnId> {
    ColumnId::ALL.to_vec()
}

/// True when `order` holds each column exactly once.
pub fn is_valid_order(order: &[ColumnId]) -> bool {
    order.len() == ColumnId::ALL.len() && ColumnId::ALL.iter().all(|c| order.contains(c))
}

/// Move the column at `from` to position `to`, shifting the rest.
///
/// Out-of-range indices leave the order unchanged.
pub fn move_column(order: &[ColumnId], from: usize, to: usize) -> Vec<ColumnId> {
    let mut moved = order.to_vec();
    if from >= moved.len() || to >= moved.len() {
        return moved;
    }
    let column = moved.remove(from);
    moved.insert(to, column);
    moved
}

fn storage_key(phase_id: &str) -> String {
    format!("kanban_{}", phase_id)
}

/// Column orders for every phase, kept in one JSON file.
#[derive(Debug, Clone)]
pub struct ColumnOrderStore {
    path: PathBuf,
}

impl ColumnOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, serde_json::Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read kanban file: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse kanban file: {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create kanban directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(entries).context("Failed to serialize kanban orders")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write kanban file: {}", self.path.display()))
    }

    /// The saved order for a phase, falling back to the default when there
    /// is no phase, nothing saved, or the saved entry is not a permutation
    /// of the three columns.
    pub fn load(&self, phase_id: Option<&str>) -> Result<Vec<ColumnId>> {
        let Some(phase_id) = phase_id else {
            return Ok(default_order());
        };
        let entries = self.read_all()?;
        let stored = entries
            .get(&storage_key(phase_id))
            .and_then(|value| serde_json::from_value::<Vec<ColumnId>>(value.clone()).ok())
            .filter(|order| is_valid_order(order));

        match stored {
            Some(order) => Ok(order),
            None => {
                tracing::debug!(phase_id, "no usable saved column order, using default");
                Ok(default_order())
            }
        }
    }

    pub fn save(&self, phase_id: &str, order: &[ColumnId]) -> Result<()> {
        if !is_valid_order(order) {
            anyhow::bail!("Column order must contain onHold, inProgress and completed exactly once");
        }
        let mut entries = self.read_all()?;
        entries.insert(
            storage_key(phase_id),
            serde_json::to_value(order).context("Failed to serialize column order")?,
        );
        self.write_all(&entries)
    }

    pub fn reset(&self, phase_id: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(&storage_key(phase_id)).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoardColumn {
    pub id: ColumnId,
    pub tasks: Vec<Task>,
}

/// A phase's tasks laid out in the user's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub columns: Vec<BoardColumn>,
}

impl Board {
    pub fn from_detail(detail: &PhaseDetail, order: &[ColumnId]) -> Self {
        let columns = order
            .iter()
            .map(|id| {
                let tasks = match id {
                    ColumnId::OnHold => &detail.on_hold,
                    ColumnId::InProgress => &detail.in_progress,
                    ColumnId::Completed => &detail.completed,
                };
                BoardColumn {
                    id: *id,
                    tasks: tasks.clone(),
                }
            })
            .collect();
        Self { columns }
    }

    /// The column currently holding a task.
    pub fn task_column(&self, task_id: &str) -> Option<ColumnId> {
        self.columns
            .iter()
            .find(|column| column.tasks.iter().any(|t| t.task_id == task_id))
            .map(|column| column.id)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|c| c.tasks.len()).sum()
    }
}

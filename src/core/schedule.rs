use chrono::NaiveDate;

use crate::domain::model::ScheduledTask;
use crate::utils::error::{PortalError, Result};

/// Supervisor day-planner entries. The link to a repair request is loose:
/// no referential invariant is enforced on `request_id`.
#[derive(Debug, Default)]
pub struct SchedulePlanner {
    tasks: Vec<ScheduledTask>,
}

impl SchedulePlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> &[ScheduledTask] {
        &self.tasks
    }

    pub fn on_date(&self, date: NaiveDate) -> Vec<&ScheduledTask> {
        self.tasks.iter().filter(|t| t.date == date).collect()
    }

    pub fn insert(&mut self, task: ScheduledTask) -> Result<()> {
        if self.tasks.iter().any(|t| t.id == task.id) {
            return Err(PortalError::ValidationError {
                field: "tasks.id".to_string(),
                reason: format!("duplicate task id {}", task.id),
            });
        }
        if task.start >= task.end {
            return Err(PortalError::ValidationError {
                field: "end".to_string(),
                reason: "task end must be after its start".to_string(),
            });
        }
        self.tasks.push(task);
        Ok(())
    }
}

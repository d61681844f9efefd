use crate::error::{Result, StudioError};
use crate::paths;
use crate::types::GoalStatus;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_goal_id: Option<String>,
}

pub fn add_goal(goals: &mut Vec<Goal>, text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StudioError::InvalidName("goal text must not be empty".to_string()));
    }
    let goal = Goal {
        id: paths::new_id(),
        text: text.to_string(),
        status: GoalStatus::NotStarted,
        linked_goal_id: None,
    };
    let id = goal.id.clone();
    goals.push(goal);
    Ok(id)
}

pub fn set_status(goals: &mut [Goal], id: &str, status: GoalStatus) -> Result<()> {
    find_mut(goals, id)?.status = status;
    Ok(())
}

/// Link `id` to `target`. Both must exist and differ.
pub fn link(goals: &mut [Goal], id: &str, target: &str) -> Result<()> {
    if id == target {
        return Err(StudioError::InvalidLink(format!("goal {id} cannot link to itself")));
    }
    if !goals.iter().any(|g| g.id == target) {
        return Err(StudioError::GoalNotFound(target.to_string()));
    }
    find_mut(goals, id)?.linked_goal_id = Some(target.to_string());
    Ok(())
}

pub fn unlink(goals: &mut [Goal], id: &str) -> Result<()> {
    find_mut(goals, id)?.linked_goal_id = None;
    Ok(())
}

/// Delete a goal and clear every link that pointed at it.
pub fn delete_goal(goals: &mut Vec<Goal>, id: &str) -> Result<Goal> {
    let pos = goals
        .iter()
        .position(|g| g.id == id)
        .ok_or_else(|| StudioError::GoalNotFound(id.to_string()))?;
    let removed = goals.remove(pos);
    for g in goals.iter_mut() {
        if g.linked_goal_id.as_deref() == Some(id) {
            g.linked_goal_id = None;
        }
    }
    Ok(removed)
}

/// Fraction of goals completed, `0.0` for an empty list.
pub fn progress(goals: &[Goal]) -> f64 {
    if goals.is_empty() {
        return 0.0;
    }
    let done = goals
        .iter()
        .filter(|g| g.status == GoalStatus::Completed)
        .count();
    done as f64 / goals.len() as f64
}

fn find_mut<'a>(goals: &'a mut [Goal], id: &str) -> Result<&'a mut Goal> {
    goals
        .iter_mut()
        .find(|g| g.id == id)
        .ok_or_else(|| StudioError::GoalNotFound(id.to_string()))
}

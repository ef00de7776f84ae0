//! Group: a named subset of a competition's teams, used by group stages.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    /// Display position; group-stage rounds are interleaved in this order.
    pub sort_order: u32,
}

impl Group {
    pub fn new(name: impl Into<String>, sort_order: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sort_order,
        }
    }
}

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Nudge lifecycle states. `ACTIVE` is the only non-terminal state.
pub const NUDGE_STATUS_ACTIVE: &str = "ACTIVE";
pub const NUDGE_STATUS_DISMISSED: &str = "DISMISSED";
pub const NUDGE_STATUS_COMPLETED: &str = "COMPLETED";

/// Nudge types
pub const NUDGE_CREATE_FIRST_BUDGET: &str = "CREATE_FIRST_BUDGET";
pub const NUDGE_ADD_FIRST_TRANSACTION: &str = "ADD_FIRST_TRANSACTION";
pub const NUDGE_CREATE_FIRST_GOAL: &str = "CREATE_FIRST_GOAL";
pub const NUDGE_INACTIVITY: &str = "INACTIVITY";
pub const NUDGE_BUDGET_OVERSPENT: &str = "BUDGET_OVERSPENT";
pub const NUDGE_GOAL_REACHED: &str = "GOAL_REACHED";

/// An engagement nudge. The condition key identifies the trigger condition
/// so an equivalent active nudge is never duplicated; the snapshot records
/// the state that tripped it.
#[derive(
    Queryable, Selectable, Identifiable, Insertable, AsChangeset, Serialize, Deserialize,
    PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::nudges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[diesel(treat_none_as_null = true)]
#[serde(rename_all = "camelCase")]
pub struct Nudge {
    pub id: String,
    pub user_id: String,
    pub nudge_type: String,
    pub message: String,
    pub status: String,
    pub condition_key: String,
    /// Serialized trigger-condition snapshot (JSON).
    pub condition_snapshot: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Nudge {
    pub fn is_active(&self) -> bool {
        self.status == NUDGE_STATUS_ACTIVE
    }
}

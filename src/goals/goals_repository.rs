use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::errors::{Error, Result};
use crate::goals::goals_model::{
    GoalContribution, GoalContributionDB, SavingsGoal, SavingsGoalDB,
};
use crate::schema::{goal_contributions, savings_goals};

pub struct GoalRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl GoalRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }

    pub fn get_goals(&self, user_id: &str) -> Result<Vec<SavingsGoal>> {
        let mut conn = get_connection(&self.pool)?;
        Self::load_all(&mut conn, user_id)
    }

    pub fn get_goal(&self, user_id: &str, goal_id: &str) -> Result<SavingsGoal> {
        let mut conn = get_connection(&self.pool)?;
        Self::find_scoped(&mut conn, user_id, goal_id).map(SavingsGoal::from)
    }

    pub fn get_contributions(&self, user_id: &str, goal_id: &str) -> Result<Vec<GoalContribution>> {
        let mut conn = get_connection(&self.pool)?;
        // Ownership check first so probing a foreign goal id fails loudly.
        Self::find_scoped(&mut conn, user_id, goal_id)?;

        goal_contributions::table
            .filter(goal_contributions::goal_id.eq(goal_id))
            .order(goal_contributions::month.asc())
            .select(GoalContributionDB::as_select())
            .load::<GoalContributionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(GoalContribution::from).collect())
            .map_err(Error::from)
    }

    pub(crate) fn load_all(conn: &mut SqliteConnection, user_id: &str) -> Result<Vec<SavingsGoal>> {
        savings_goals::table
            .filter(savings_goals::user_id.eq(user_id))
            .order(savings_goals::created_at.asc())
            .select(SavingsGoalDB::as_select())
            .load::<SavingsGoalDB>(conn)
            .map(|rows| rows.into_iter().map(SavingsGoal::from).collect())
            .map_err(Error::from)
    }

    pub(crate) fn find_scoped(
        conn: &mut SqliteConnection,
        user_id: &str,
        goal_id: &str,
    ) -> Result<SavingsGoalDB> {
        let row = savings_goals::table
            .find(goal_id)
            .select(SavingsGoalDB::as_select())
            .first::<SavingsGoalDB>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound(format!("Savings goal {}", goal_id)))?;

        if row.user_id != user_id {
            return Err(Error::Ownership(format!("Savings goal {}", goal_id)));
        }
        Ok(row)
    }

    pub(crate) fn insert(conn: &mut SqliteConnection, row: &SavingsGoalDB) -> Result<SavingsGoal> {
        diesel::insert_into(savings_goals::table)
            .values(row)
            .returning(SavingsGoalDB::as_returning())
            .get_result::<SavingsGoalDB>(conn)
            .map(SavingsGoal::from)
            .map_err(Error::from)
    }

    pub(crate) fn update(conn: &mut SqliteConnection, row: &SavingsGoalDB) -> Result<SavingsGoal> {
        diesel::update(savings_goals::table.find(&row.id))
            .set(row)
            .returning(SavingsGoalDB::as_returning())
            .get_result::<SavingsGoalDB>(conn)
            .map(SavingsGoal::from)
            .map_err(Error::from)
    }

    pub(crate) fn delete(conn: &mut SqliteConnection, goal_id: &str) -> Result<usize> {
        diesel::delete(
            goal_contributions::table.filter(goal_contributions::goal_id.eq(goal_id)),
        )
        .execute(conn)?;
        diesel::delete(savings_goals::table.find(goal_id))
            .execute(conn)
            .map_err(Error::from)
    }

    pub(crate) fn find_contribution_for_month(
        conn: &mut SqliteConnection,
        goal_id: &str,
        month: &str,
    ) -> Result<Option<GoalContributionDB>> {
        goal_contributions::table
            .filter(goal_contributions::goal_id.eq(goal_id))
            .filter(goal_contributions::month.eq(month))
            .select(GoalContributionDB::as_select())
            .first::<GoalContributionDB>(conn)
            .optional()
            .map_err(Error::from)
    }

    pub(crate) fn insert_contribution(
        conn: &mut SqliteConnection,
        row: &GoalContributionDB,
    ) -> Result<()> {
        diesel::insert_into(goal_contributions::table)
            .values(row)
            .execute(conn)?;
        Ok(())
    }

    pub(crate) fn update_contribution(
        conn: &mut SqliteConnection,
        row: &GoalContributionDB,
    ) -> Result<()> {
        diesel::update(goal_contributions::table.find(&row.id))
            .set(row)
            .execute(conn)?;
        Ok(())
    }

    pub(crate) fn delete_all_for_user(conn: &mut SqliteConnection, user_id: &str) -> Result<usize> {
        diesel::delete(
            goal_contributions::table.filter(goal_contributions::user_id.eq(user_id)),
        )
        .execute(conn)?;
        diesel::delete(savings_goals::table.filter(savings_goals::user_id.eq(user_id)))
            .execute(conn)
            .map_err(Error::from)
    }
}

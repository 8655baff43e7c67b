use serde::Serialize;
use serde_json::json;
use std::collections::HashSet;

use crate::constants::INACTIVITY_NUDGE_DAYS;
use crate::nudges::nudges_model::{
    NUDGE_ADD_FIRST_TRANSACTION, NUDGE_BUDGET_OVERSPENT, NUDGE_CREATE_FIRST_BUDGET,
    NUDGE_CREATE_FIRST_GOAL, NUDGE_GOAL_REACHED, NUDGE_INACTIVITY,
};
use crate::users::users_model::OnboardingStage;

/// Snapshot of the user state nudge conditions are evaluated against.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NudgeContext {
    #[serde(skip)]
    pub onboarding_stage: OnboardingStage,
    pub days_since_last_transaction: Option<i64>,
    pub has_budget: bool,
    pub has_goal: bool,
    /// Names of categories currently over their budget.
    pub overspent_categories: Vec<String>,
    /// (goal id, goal name) pairs at 100% progress.
    pub achieved_goals: Vec<(String, String)>,
}

/// A nudge the engine wants created.
#[derive(Debug, Clone, PartialEq)]
pub struct NudgeProposal {
    pub nudge_type: String,
    pub message: String,
    pub condition_key: String,
    pub snapshot: serde_json::Value,
}

/// Evaluates which trigger conditions are newly true. Pure function: the
/// caller supplies the condition keys of currently active nudges, and any
/// condition already represented there is skipped, which makes repeated
/// evaluation idempotent.
pub fn evaluate(ctx: &NudgeContext, active_keys: &HashSet<String>) -> Vec<NudgeProposal> {
    let mut proposals = Vec::new();

    if !ctx.has_budget {
        proposals.push(NudgeProposal {
            nudge_type: NUDGE_CREATE_FIRST_BUDGET.to_string(),
            message: "Set up your first budget category to start tracking spending.".to_string(),
            condition_key: NUDGE_CREATE_FIRST_BUDGET.to_string(),
            snapshot: json!({ "onboardingStage": ctx.onboarding_stage.as_str() }),
        });
    }

    if ctx.has_budget && ctx.days_since_last_transaction.is_none() {
        proposals.push(NudgeProposal {
            nudge_type: NUDGE_ADD_FIRST_TRANSACTION.to_string(),
            message: "Add your first transaction to see where your money goes.".to_string(),
            condition_key: NUDGE_ADD_FIRST_TRANSACTION.to_string(),
            snapshot: json!({ "onboardingStage": ctx.onboarding_stage.as_str() }),
        });
    }

    if ctx.onboarding_stage >= OnboardingStage::TransactionAdded && !ctx.has_goal {
        proposals.push(NudgeProposal {
            nudge_type: NUDGE_CREATE_FIRST_GOAL.to_string(),
            message: "Create a savings goal to give your money a direction.".to_string(),
            condition_key: NUDGE_CREATE_FIRST_GOAL.to_string(),
            snapshot: json!({ "onboardingStage": ctx.onboarding_stage.as_str() }),
        });
    }

    if let Some(days) = ctx.days_since_last_transaction {
        if days >= INACTIVITY_NUDGE_DAYS {
            proposals.push(NudgeProposal {
                nudge_type: NUDGE_INACTIVITY.to_string(),
                message: "It has been a while. Log a transaction to keep your picture current."
                    .to_string(),
                condition_key: NUDGE_INACTIVITY.to_string(),
                snapshot: json!({ "daysSinceLastTransaction": days }),
            });
        }
    }

    for name in &ctx.overspent_categories {
        proposals.push(NudgeProposal {
            nudge_type: NUDGE_BUDGET_OVERSPENT.to_string(),
            message: format!("You are over budget in {}.", name),
            condition_key: format!("{}:{}", NUDGE_BUDGET_OVERSPENT, name.to_lowercase()),
            snapshot: json!({ "category": name }),
        });
    }

    for (goal_id, goal_name) in &ctx.achieved_goals {
        proposals.push(NudgeProposal {
            nudge_type: NUDGE_GOAL_REACHED.to_string(),
            message: format!("You reached your goal '{}'. Time to set the next one?", goal_name),
            condition_key: format!("{}:{}", NUDGE_GOAL_REACHED, goal_id),
            snapshot: json!({ "goalId": goal_id, "goalName": goal_name }),
        });
    }

    proposals
        .into_iter()
        .filter(|p| !active_keys.contains(&p.condition_key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_is_nudged_to_create_a_budget() {
        let ctx = NudgeContext::default();
        let proposals = evaluate(&ctx, &HashSet::new());
        assert!(proposals
            .iter()
            .any(|p| p.nudge_type == NUDGE_CREATE_FIRST_BUDGET));
    }

    #[test]
    fn active_nudge_suppresses_an_equivalent_proposal() {
        let ctx = NudgeContext::default();
        let mut active = HashSet::new();
        active.insert(NUDGE_CREATE_FIRST_BUDGET.to_string());

        let proposals = evaluate(&ctx, &active);
        assert!(!proposals
            .iter()
            .any(|p| p.nudge_type == NUDGE_CREATE_FIRST_BUDGET));
    }

    #[test]
    fn inactivity_fires_only_past_the_threshold() {
        let mut ctx = NudgeContext {
            has_budget: true,
            days_since_last_transaction: Some(INACTIVITY_NUDGE_DAYS - 1),
            ..Default::default()
        };
        assert!(!evaluate(&ctx, &HashSet::new())
            .iter()
            .any(|p| p.nudge_type == NUDGE_INACTIVITY));

        ctx.days_since_last_transaction = Some(INACTIVITY_NUDGE_DAYS);
        assert!(evaluate(&ctx, &HashSet::new())
            .iter()
            .any(|p| p.nudge_type == NUDGE_INACTIVITY));
    }

    #[test]
    fn overspent_categories_get_one_nudge_each() {
        let ctx = NudgeContext {
            has_budget: true,
            days_since_last_transaction: Some(1),
            overspent_categories: vec!["Dining".to_string(), "Travel".to_string()],
            ..Default::default()
        };
        let proposals = evaluate(&ctx, &HashSet::new());
        let overspent: Vec<_> = proposals
            .iter()
            .filter(|p| p.nudge_type == NUDGE_BUDGET_OVERSPENT)
            .collect();
        assert_eq!(overspent.len(), 2);
        assert_ne!(overspent[0].condition_key, overspent[1].condition_key);
    }

    #[test]
    fn goal_nudge_waits_for_the_transaction_milestone() {
        let mut ctx = NudgeContext {
            has_budget: true,
            days_since_last_transaction: Some(1),
            ..Default::default()
        };
        assert!(!evaluate(&ctx, &HashSet::new())
            .iter()
            .any(|p| p.nudge_type == NUDGE_CREATE_FIRST_GOAL));

        ctx.onboarding_stage = OnboardingStage::TransactionAdded;
        assert!(evaluate(&ctx, &HashSet::new())
            .iter()
            .any(|p| p.nudge_type == NUDGE_CREATE_FIRST_GOAL));
    }
}

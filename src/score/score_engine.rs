use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::constants::{
    SCORE_FLOOR_LOGGED_IN, SCORE_WEIGHT_ACTIVITY, SCORE_WEIGHT_ADHERENCE, SCORE_WEIGHT_SAVINGS,
    WEEKLY_ACTIVITY_POINTS,
};

/// Snapshot of the ledger state a score is computed from.
#[derive(Debug, Clone, Default)]
pub struct ScoreInput {
    /// (budget_amount, spent_amount) per budget category.
    pub categories: Vec<(Decimal, Decimal)>,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    /// All-time transaction count; decides whether the user has any data.
    pub transaction_count: i64,
    /// Transactions in the trailing 7 days.
    pub transactions_last_week: i64,
    pub has_logged_in: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub score: i32,
    pub budget_adherence: i32,
    pub savings_progress: i32,
    pub weekly_activity: i32,
}

/// Recomputes the bounded health score from current state. Pure function;
/// every output is clamped to [0, 100] no matter how adversarial the input.
pub fn compute(input: &ScoreInput) -> ScoreBreakdown {
    let budget_adherence = budget_adherence(&input.categories);
    let savings_progress = savings_progress(input.total_income, input.total_expenses);
    let weekly_activity = weekly_activity(input.transactions_last_week);

    let has_data = !input.categories.is_empty() || input.transaction_count > 0;
    let score = if has_data {
        let weighted = SCORE_WEIGHT_ADHERENCE * f64::from(budget_adherence)
            + SCORE_WEIGHT_SAVINGS * f64::from(savings_progress)
            + SCORE_WEIGHT_ACTIVITY * f64::from(weekly_activity);
        clamp(weighted.round() as i32)
    } else if input.has_logged_in {
        SCORE_FLOOR_LOGGED_IN
    } else {
        0
    };

    ScoreBreakdown {
        score,
        budget_adherence,
        savings_progress,
        weekly_activity,
    }
}

/// Share of categories at or under budget. A blown category simply does not
/// count as under budget; it can never push the score negative.
fn budget_adherence(categories: &[(Decimal, Decimal)]) -> i32 {
    if categories.is_empty() {
        return 0;
    }
    let under = categories
        .iter()
        .filter(|(budget, spent)| spent <= budget)
        .count();
    let ratio = 100.0 * under as f64 / categories.len() as f64;
    clamp(ratio.round() as i32)
}

fn savings_progress(income: Decimal, expenses: Decimal) -> i32 {
    if income <= Decimal::ZERO {
        return 0;
    }
    let saved = (income - expenses).max(Decimal::ZERO);
    let ratio = (saved / income * Decimal::from(100)).to_f64().unwrap_or(0.0);
    clamp(ratio.round() as i32)
}

fn weekly_activity(transactions_last_week: i64) -> i32 {
    let points = transactions_last_week.max(0).saturating_mul(WEEKLY_ACTIVITY_POINTS as i64);
    clamp(points.min(100) as i32)
}

fn clamp(value: i32) -> i32 {
    value.clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn empty_state_without_login_scores_zero() {
        let breakdown = compute(&ScoreInput::default());
        assert_eq!(breakdown.score, 0);
        assert_eq!(breakdown.budget_adherence, 0);
        assert_eq!(breakdown.savings_progress, 0);
        assert_eq!(breakdown.weekly_activity, 0);
    }

    #[test]
    fn logged_in_user_with_no_data_gets_the_floor_score() {
        let input = ScoreInput {
            has_logged_in: true,
            ..Default::default()
        };
        assert_eq!(compute(&input).score, SCORE_FLOOR_LOGGED_IN);
    }

    #[test]
    fn adherence_counts_categories_at_or_under_budget() {
        let input = ScoreInput {
            categories: vec![
                (dec!(100), dec!(50)),
                (dec!(100), dec!(100)),
                (dec!(100), dec!(150)),
            ],
            transaction_count: 1,
            ..Default::default()
        };
        assert_eq!(compute(&input).budget_adherence, 67);
    }

    #[test]
    fn overspent_categories_never_drive_scores_negative() {
        let input = ScoreInput {
            categories: vec![(dec!(10), dec!(99999999))],
            total_income: dec!(1),
            total_expenses: dec!(99999999),
            transaction_count: 1000,
            transactions_last_week: 1000,
            ..Default::default()
        };
        let breakdown = compute(&input);
        for value in [
            breakdown.score,
            breakdown.budget_adherence,
            breakdown.savings_progress,
            breakdown.weekly_activity,
        ] {
            assert!((0..=100).contains(&value));
        }
    }

    #[test]
    fn savings_progress_is_saved_share_of_income() {
        let input = ScoreInput {
            total_income: dec!(1000),
            total_expenses: dec!(700),
            transaction_count: 2,
            ..Default::default()
        };
        assert_eq!(compute(&input).savings_progress, 30);
    }

    #[test]
    fn zero_income_means_zero_savings_progress() {
        let input = ScoreInput {
            total_expenses: dec!(700),
            transaction_count: 1,
            ..Default::default()
        };
        assert_eq!(compute(&input).savings_progress, 0);
    }

    #[test]
    fn weekly_activity_caps_at_ten_transactions() {
        let input = ScoreInput {
            transactions_last_week: 4,
            transaction_count: 4,
            ..Default::default()
        };
        assert_eq!(compute(&input).weekly_activity, 40);

        let input = ScoreInput {
            transactions_last_week: 25,
            transaction_count: 25,
            ..Default::default()
        };
        assert_eq!(compute(&input).weekly_activity, 100);
    }

    #[test]
    fn composite_uses_the_documented_weights() {
        let input = ScoreInput {
            categories: vec![(dec!(100), dec!(50))],
            total_income: dec!(1000),
            total_expenses: dec!(500),
            transaction_count: 3,
            transactions_last_week: 3,
            ..Default::default()
        };
        // 0.5*100 + 0.3*50 + 0.2*30 = 71
        assert_eq!(compute(&input).score, 71);
    }
}

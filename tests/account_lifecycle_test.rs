use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio_test::block_on;

use fintrack_core::budget::{BudgetRepository, BudgetService, BudgetServiceTrait, NewBudgetCategory};
use fintrack_core::goals::{GoalRepository, GoalService, GoalServiceTrait, NewSavingsGoal};
use fintrack_core::nudges::{
    NudgeRepository, NudgeService, NudgeServiceTrait, NUDGE_CREATE_FIRST_BUDGET,
};
use fintrack_core::transactions::{
    TransactionFilter, TransactionRepository, TransactionService, TransactionServiceTrait,
};
use fintrack_core::users::{NewUser, OnboardingStage, UserRepository, UserService, UserServiceTrait};
use fintrack_core::Error;

mod common;

fn user_service(db: &common::TestDb) -> UserService {
    UserService::new(db.pool.clone(), Arc::new(UserRepository::new(db.pool.clone())))
}

#[test]
fn duplicate_email_registration_is_rejected() {
    let db = common::setup_db();
    let users = user_service(&db);

    common::register_user(&db.pool, "same@example.com");
    let err = block_on(users.register(NewUser {
        email: "  SAME@example.com ".to_string(),
        display_name: None,
    }))
    .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn foreign_records_are_invisible_and_untouchable() {
    let db = common::setup_db();
    let alice = common::register_user(&db.pool, "alice@example.com");
    let mallory = common::register_user(&db.pool, "mallory@example.com");

    let transactions = TransactionService::new(
        db.pool.clone(),
        Arc::new(TransactionRepository::new(db.pool.clone())),
    );
    let tx = block_on(transactions.add_transaction(
        &alice.id,
        common::raw_expense(15.0, "Cafe Luna", "2025-05-01"),
    ))
    .unwrap();

    // Probing someone else's id is an ownership failure, distinct from a
    // plain miss.
    let err = transactions.get_transaction(&mallory.id, &tx.id).unwrap_err();
    assert!(matches!(err, Error::Ownership(_)));
    let err = transactions.get_transaction(&alice.id, "no-such-id").unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err =
        block_on(transactions.delete_transaction(&mallory.id, &tx.id)).unwrap_err();
    assert!(matches!(err, Error::Ownership(_)));

    // Listings never leak across users.
    let visible = transactions
        .get_transactions(&mallory.id, &TransactionFilter::default())
        .unwrap();
    assert!(visible.is_empty());
}

#[test]
fn onboarding_completes_once_all_milestones_are_hit() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "nora@example.com");
    assert_eq!(user.onboarding_stage, OnboardingStage::New);

    let budgets = BudgetService::new(
        db.pool.clone(),
        Arc::new(BudgetRepository::new(db.pool.clone())),
    );
    let transactions = TransactionService::new(
        db.pool.clone(),
        Arc::new(TransactionRepository::new(db.pool.clone())),
    );
    let goals = GoalService::new(
        db.pool.clone(),
        Arc::new(GoalRepository::new(db.pool.clone())),
    );
    let users = user_service(&db);

    block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Dining".to_string(),
            budget_amount: dec!(100),
        },
    ))
    .unwrap();
    assert_eq!(
        users.get_user(&user.id).unwrap().onboarding_stage,
        OnboardingStage::BudgetCreated
    );

    block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(10.0, "Cafe Luna", "2025-05-01"),
    ))
    .unwrap();
    assert_eq!(
        users.get_user(&user.id).unwrap().onboarding_stage,
        OnboardingStage::TransactionAdded
    );

    block_on(goals.create_goal(
        &user.id,
        NewSavingsGoal {
            name: "Trip".to_string(),
            target_amount: dec!(800),
            target_date: None,
        },
    ))
    .unwrap();
    // Third distinct milestone completes onboarding outright.
    assert_eq!(
        users.get_user(&user.id).unwrap().onboarding_stage,
        OnboardingStage::Completed
    );
}

#[test]
fn nudges_are_deduplicated_and_transitions_are_terminal() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "omar@example.com");
    let nudges = NudgeService::new(
        db.pool.clone(),
        Arc::new(NudgeRepository::new(db.pool.clone())),
    );

    // Registration already raised the first-budget nudge; re-evaluating
    // must not raise it again.
    block_on(nudges.evaluate(&user.id)).unwrap();
    block_on(nudges.evaluate(&user.id)).unwrap();

    let active = nudges.get_active_nudges(&user.id).unwrap();
    let first_budget: Vec<_> = active
        .iter()
        .filter(|n| n.nudge_type == NUDGE_CREATE_FIRST_BUDGET)
        .collect();
    assert_eq!(first_budget.len(), 1);

    let dismissed = block_on(nudges.dismiss_nudge(&user.id, &first_budget[0].id)).unwrap();
    assert_eq!(dismissed.status, "DISMISSED");

    // Terminal states reject further transitions instead of ignoring them.
    let err = block_on(nudges.complete_nudge(&user.id, &dismissed.id)).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn overspend_raises_a_nudge_with_a_snapshot() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "pia@example.com");

    let budgets = BudgetService::new(
        db.pool.clone(),
        Arc::new(BudgetRepository::new(db.pool.clone())),
    );
    let transactions = TransactionService::new(
        db.pool.clone(),
        Arc::new(TransactionRepository::new(db.pool.clone())),
    );
    let nudges = NudgeService::new(
        db.pool.clone(),
        Arc::new(NudgeRepository::new(db.pool.clone())),
    );

    block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Dining".to_string(),
            budget_amount: dec!(50),
        },
    ))
    .unwrap();
    block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(80.0, "Sushi Garden Restaurant", "2025-05-01"),
    ))
    .unwrap();

    let active = nudges.get_active_nudges(&user.id).unwrap();
    let overspent = active
        .iter()
        .find(|n| n.nudge_type == "BUDGET_OVERSPENT")
        .expect("overspend nudge raised");
    assert!(overspent.condition_key.contains("dining"));
    assert!(overspent.condition_snapshot.contains("Dining"));
}

#[test]
fn deleting_an_account_cascades_to_every_owned_record() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "quin@example.com");
    let survivor = common::register_user(&db.pool, "rhea@example.com");
    let users = user_service(&db);

    let budgets = BudgetService::new(
        db.pool.clone(),
        Arc::new(BudgetRepository::new(db.pool.clone())),
    );
    let transactions = TransactionService::new(
        db.pool.clone(),
        Arc::new(TransactionRepository::new(db.pool.clone())),
    );
    let goals = GoalService::new(
        db.pool.clone(),
        Arc::new(GoalRepository::new(db.pool.clone())),
    );

    block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Dining".to_string(),
            budget_amount: dec!(100),
        },
    ))
    .unwrap();
    block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(10.0, "Cafe Luna", "2025-05-01"),
    ))
    .unwrap();
    let goal = block_on(goals.create_goal(
        &user.id,
        NewSavingsGoal {
            name: "Trip".to_string(),
            target_amount: dec!(800),
            target_date: None,
        },
    ))
    .unwrap();
    block_on(goals.add_amount(&user.id, &goal.id, dec!(50))).unwrap();

    block_on(transactions.add_transaction(
        &survivor.id,
        common::raw_expense(12.0, "Cafe Luna", "2025-05-01"),
    ))
    .unwrap();

    block_on(users.delete_account(&user.id)).unwrap();

    let err = users.get_user(&user.id).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(transactions
        .get_transactions(&user.id, &TransactionFilter::default())
        .unwrap()
        .is_empty());
    assert!(budgets.get_categories(&user.id).unwrap().is_empty());
    assert!(goals.get_goals(&user.id).unwrap().is_empty());

    // Unrelated accounts are untouched.
    assert_eq!(
        transactions
            .get_transactions(&survivor.id, &TransactionFilter::default())
            .unwrap()
            .len(),
        1
    );

    let err = block_on(users.delete_account(&user.id)).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

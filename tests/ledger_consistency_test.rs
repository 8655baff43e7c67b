use std::sync::Arc;

use rust_decimal_macros::dec;
use tokio_test::block_on;

use fintrack_core::budget::{
    BudgetCategoryUpdate, BudgetRepository, BudgetService, BudgetServiceTrait, NewBudgetCategory,
};
use fintrack_core::goals::{GoalRepository, GoalService, GoalServiceTrait, NewSavingsGoal};
use fintrack_core::ingest::RawTransactionInput;
use fintrack_core::transactions::{
    TransactionRepository, TransactionService, TransactionServiceTrait, TransactionUpdate,
};

mod common;

fn services(db: &common::TestDb) -> (TransactionService, BudgetService, GoalService) {
    (
        TransactionService::new(
            db.pool.clone(),
            Arc::new(TransactionRepository::new(db.pool.clone())),
        ),
        BudgetService::new(
            db.pool.clone(),
            Arc::new(BudgetRepository::new(db.pool.clone())),
        ),
        GoalService::new(
            db.pool.clone(),
            Arc::new(GoalRepository::new(db.pool.clone())),
        ),
    )
}

#[test]
fn update_and_delete_keep_spent_reconciled() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "fay@example.com");
    let (transactions, budgets, _) = services(&db);

    let dining = block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Dining".to_string(),
            budget_amount: dec!(200),
        },
    ))
    .unwrap();

    let tx = block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(40.0, "Pizza Palace", "2025-05-10"),
    ))
    .unwrap();
    assert_eq!(
        budgets.get_category(&user.id, &dining.id).unwrap().spent_amount,
        dec!(40)
    );

    block_on(transactions.update_transaction(
        &user.id,
        TransactionUpdate {
            id: tx.id.clone(),
            input: common::raw_expense(55.0, "Pizza Palace", "2025-05-10"),
            is_duplicate: None,
        },
    ))
    .unwrap();
    assert_eq!(
        budgets.get_category(&user.id, &dining.id).unwrap().spent_amount,
        dec!(55)
    );

    block_on(transactions.delete_transaction(&user.id, &tx.id)).unwrap();
    assert_eq!(
        budgets.get_category(&user.id, &dining.id).unwrap().spent_amount,
        dec!(0)
    );
}

#[test]
fn editing_the_category_moves_spent_between_budgets() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "eli@example.com");
    let (transactions, budgets, _) = services(&db);

    let dining = block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Dining".to_string(),
            budget_amount: dec!(200),
        },
    ))
    .unwrap();
    let groceries = block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Groceries".to_string(),
            budget_amount: dec!(300),
        },
    ))
    .unwrap();

    let tx = block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(40.0, "Pizza Palace", "2025-05-10"),
    ))
    .unwrap();
    assert_eq!(tx.category, "Dining");

    // Category-only edit: everything else comes from the stored row.
    let updated = block_on(transactions.update_transaction(
        &user.id,
        TransactionUpdate {
            id: tx.id.clone(),
            input: RawTransactionInput {
                category: Some("Groceries".to_string()),
                ..Default::default()
            },
            is_duplicate: None,
        },
    ))
    .unwrap();

    assert_eq!(updated.category, "Groceries");
    assert_eq!(updated.amount, dec!(40));
    assert_eq!(updated.merchant, "Pizza Palace");
    assert_eq!(updated.transaction_date, tx.transaction_date);

    assert_eq!(
        budgets.get_category(&user.id, &dining.id).unwrap().spent_amount,
        dec!(0)
    );
    assert_eq!(
        budgets.get_category(&user.id, &groceries.id).unwrap().spent_amount,
        dec!(40)
    );
}

#[test]
fn amount_only_edit_preserves_the_original_date() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "max@example.com");
    let (transactions, _, _) = services(&db);

    let tx = block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(40.0, "Pizza Palace", "2025-05-10"),
    ))
    .unwrap();

    let updated = block_on(transactions.update_transaction(
        &user.id,
        TransactionUpdate {
            id: tx.id.clone(),
            input: RawTransactionInput {
                amount: Some(fintrack_core::ingest::RawAmount::Number(55.0)),
                ..Default::default()
            },
            is_duplicate: None,
        },
    ))
    .unwrap();

    assert_eq!(updated.amount, dec!(55));
    assert_eq!(updated.merchant, "Pizza Palace");
    assert_eq!(updated.category, "Dining");
    // The edit must not slide the transaction to today.
    assert_eq!(updated.transaction_date, tx.transaction_date);
}

#[test]
fn category_created_after_its_transactions_starts_reconciled() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "gil@example.com");
    let (transactions, budgets, _) = services(&db);

    block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(30.0, "Whole Foods", "2025-05-01"),
    ))
    .unwrap();
    block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(20.0, "Trader Joe's", "2025-05-03"),
    ))
    .unwrap();

    let groceries = block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "groceries".to_string(),
            budget_amount: dec!(400),
        },
    ))
    .unwrap();
    // Case-insensitive match against existing expense rows.
    assert_eq!(groceries.spent_amount, dec!(50));
}

#[test]
fn renaming_a_category_rebuilds_its_spent_total() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "hal@example.com");
    let (transactions, budgets, _) = services(&db);

    block_on(transactions.add_transaction(
        &user.id,
        common::raw_expense(60.0, "Shell Gas Station", "2025-05-02"),
    ))
    .unwrap();

    let misc = block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Misc".to_string(),
            budget_amount: dec!(100),
        },
    ))
    .unwrap();
    assert_eq!(misc.spent_amount, dec!(0));

    let renamed = block_on(budgets.update_category(
        &user.id,
        BudgetCategoryUpdate {
            id: misc.id.clone(),
            name: Some("Transport".to_string()),
            budget_amount: None,
        },
    ))
    .unwrap();
    assert_eq!(renamed.spent_amount, dec!(60));
}

#[test]
fn duplicate_category_names_are_rejected_case_insensitively() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "ivy@example.com");
    let (_, budgets, _) = services(&db);

    block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "Dining".to_string(),
            budget_amount: dec!(100),
        },
    ))
    .unwrap();

    let err = block_on(budgets.create_category(
        &user.id,
        NewBudgetCategory {
            name: "  dining ".to_string(),
            budget_amount: dec!(50),
        },
    ))
    .unwrap_err();
    assert!(matches!(err, fintrack_core::Error::Validation(_)));
}

#[test]
fn goal_contributions_merge_within_the_same_month() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "joy@example.com");
    let (_, _, goals) = services(&db);

    let goal = block_on(goals.create_goal(
        &user.id,
        NewSavingsGoal {
            name: "Emergency fund".to_string(),
            target_amount: dec!(1000),
            target_date: None,
        },
    ))
    .unwrap();
    assert_eq!(goal.current_amount, dec!(0));
    assert_eq!(goal.progress_percentage, 0.0);

    block_on(goals.add_amount(&user.id, &goal.id, dec!(250))).unwrap();
    let goal = block_on(goals.add_amount(&user.id, &goal.id, dec!(250))).unwrap();

    assert_eq!(goal.current_amount, dec!(500));
    assert_eq!(goal.progress_percentage, 50.0);

    // Two deltas in the same calendar month collapse into one row.
    let contributions = goals.get_contributions(&user.id, &goal.id).unwrap();
    assert_eq!(contributions.len(), 1);
    assert_eq!(contributions[0].amount, dec!(500));

    let err = block_on(goals.add_amount(&user.id, &goal.id, dec!(-10))).unwrap_err();
    assert!(matches!(err, fintrack_core::Error::Validation(_)));
}

#[test]
fn goal_progress_is_capped_at_one_hundred() {
    let db = common::setup_db();
    let user = common::register_user(&db.pool, "kim@example.com");
    let (_, _, goals) = services(&db);

    let goal = block_on(goals.create_goal(
        &user.id,
        NewSavingsGoal {
            name: "Laptop".to_string(),
            target_amount: dec!(500),
            target_date: None,
        },
    ))
    .unwrap();

    let goal = block_on(goals.add_amount(&user.id, &goal.id, dec!(750))).unwrap();
    assert_eq!(goal.current_amount, dec!(750));
    assert_eq!(goal.progress_percentage, 100.0);
}

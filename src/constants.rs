/// Transaction types
///
/// Amounts are stored as unsigned magnitudes; the type carries the sign.
/// Money coming in: salary, refunds, transfers from elsewhere.
pub const TRANSACTION_TYPE_INCOME: &str = "INCOME";

/// Money going out. Negative raw amounts are normalized to this type.
pub const TRANSACTION_TYPE_EXPENSE: &str = "EXPENSE";

pub const TRANSACTION_TYPES: [&str; 2] = [TRANSACTION_TYPE_INCOME, TRANSACTION_TYPE_EXPENSE];

/// Ingestion sources
/// Single entry typed in by the user.
pub const SOURCE_MANUAL: &str = "MANUAL";

/// Row from a bulk file import.
pub const SOURCE_BATCH_IMPORT: &str = "BATCH_IMPORT";

/// Record delivered by the external bank-data feed.
pub const SOURCE_PROVIDER_SYNC: &str = "PROVIDER_SYNC";

pub const TRANSACTION_SOURCES: [&str; 3] = [SOURCE_MANUAL, SOURCE_BATCH_IMPORT, SOURCE_PROVIDER_SYNC];

/// Category assigned when nothing else matches.
pub const CATEGORY_UNCATEGORIZED: &str = "Uncategorized";

/// Category forced for all income transactions.
pub const CATEGORY_INCOME: &str = "Income";

/// Lookback window for the duplicate classifier, in calendar days either
/// side of the candidate's date. Absorbs provider posting-date drift.
pub const DUPLICATE_WINDOW_DAYS: i64 = 4;

/// Points per transaction in the trailing 7 days for the weekly-activity
/// sub-score. Ten transactions max out the sub-score.
pub const WEEKLY_ACTIVITY_POINTS: i32 = 10;

/// Trailing window for the weekly-activity sub-score.
pub const WEEKLY_ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Composite score weights: budget adherence / savings progress / weekly activity.
pub const SCORE_WEIGHT_ADHERENCE: f64 = 0.5;
pub const SCORE_WEIGHT_SAVINGS: f64 = 0.3;
pub const SCORE_WEIGHT_ACTIVITY: f64 = 0.2;

/// Score given to a user who has logged in but has no budget or transaction
/// data yet.
pub const SCORE_FLOOR_LOGGED_IN: i32 = 10;

/// Days without a transaction before the re-engagement nudge fires.
pub const INACTIVITY_NUDGE_DAYS: i64 = 14;

/// Wall-clock hour transaction dates are pinned to. Noon keeps the calendar
/// date stable across timezone conversions during serialization.
pub const CANONICAL_HOUR: u32 = 12;

/// Decimal precision for stored monetary amounts.
pub const AMOUNT_DECIMAL_PRECISION: u32 = 2;

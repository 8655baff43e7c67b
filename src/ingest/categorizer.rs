use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::constants::{CATEGORY_INCOME, CATEGORY_UNCATEGORIZED, TRANSACTION_TYPE_INCOME};
use crate::ingest::normalizer::TransactionDraft;

/// Category, icon and display color assigned to a draft transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAssignment {
    pub category: String,
    pub icon: String,
    pub color: String,
}

struct CategoryEntry {
    name: &'static str,
    icon: &'static str,
    color: &'static str,
    keywords: &'static [&'static str],
}

/// Keyword table, matched top to bottom. The order is part of the contract:
/// the first category whose keyword appears in the merchant text wins, so
/// reordering entries changes behavior.
static CATEGORY_TABLE: &[CategoryEntry] = &[
    CategoryEntry {
        name: "Dining",
        icon: "utensils",
        color: "#F97316",
        keywords: &[
            "restaurant", "cafe", "coffee", "starbucks", "mcdonald", "burger", "pizza", "chipotle",
            "doordash", "ubereats", "grubhub", "bar & grill", "diner", "bakery", "sushi",
        ],
    },
    CategoryEntry {
        name: "Groceries",
        icon: "shopping-basket",
        color: "#22C55E",
        keywords: &[
            "grocery", "supermarket", "whole foods", "trader joe", "safeway", "kroger", "aldi",
            "costco", "walmart supercenter", "market",
        ],
    },
    CategoryEntry {
        name: "Transport",
        icon: "car",
        color: "#3B82F6",
        keywords: &[
            "uber", "lyft", "taxi", "gas", "shell", "chevron", "exxon", "parking", "transit",
            "metro", "toll", "fuel",
        ],
    },
    CategoryEntry {
        name: "Shopping",
        icon: "shopping-cart",
        color: "#A855F7",
        keywords: &[
            "amazon", "target", "walmart", "best buy", "ebay", "etsy", "ikea", "nike", "apple store",
            "mall",
        ],
    },
    CategoryEntry {
        name: "Entertainment",
        icon: "film",
        color: "#EC4899",
        keywords: &[
            "netflix", "spotify", "hulu", "disney", "cinema", "theater", "steam", "playstation",
            "xbox", "concert", "ticketmaster",
        ],
    },
    CategoryEntry {
        name: "Bills & Utilities",
        icon: "file-text",
        color: "#64748B",
        keywords: &[
            "electric", "water bill", "utility", "internet", "comcast", "verizon", "at&t",
            "t-mobile", "insurance", "phone bill",
        ],
    },
    CategoryEntry {
        name: "Housing",
        icon: "home",
        color: "#0EA5E9",
        keywords: &["rent", "mortgage", "landlord", "property management", "hoa"],
    },
    CategoryEntry {
        name: "Health",
        icon: "heart-pulse",
        color: "#EF4444",
        keywords: &[
            "pharmacy", "cvs", "walgreens", "doctor", "dental", "clinic", "hospital", "gym",
            "fitness",
        ],
    },
    CategoryEntry {
        name: "Travel",
        icon: "plane",
        color: "#14B8A6",
        keywords: &[
            "airline", "airways", "hotel", "airbnb", "hostel", "delta", "united", "expedia",
            "booking.com",
        ],
    },
    CategoryEntry {
        name: "Education",
        icon: "graduation-cap",
        color: "#EAB308",
        keywords: &["tuition", "university", "college", "udemy", "coursera", "textbook", "school"],
    },
];

const NEUTRAL_ICON: &str = "circle";
const NEUTRAL_COLOR: &str = "#9CA3AF";

const INCOME_ICON: &str = "banknote";
const INCOME_COLOR: &str = "#16A34A";

lazy_static! {
    /// Provider taxonomy paths (lowercased, joined with " > ") and bare
    /// first labels, mapped to our category names.
    static ref TAXONOMY_MAP: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("food and drink > restaurants", "Dining");
        m.insert("food and drink > coffee shop", "Dining");
        m.insert("food and drink", "Dining");
        m.insert("shops > supermarkets and groceries", "Groceries");
        m.insert("shops", "Shopping");
        m.insert("travel > airlines and aviation services", "Travel");
        m.insert("travel > taxi", "Transport");
        m.insert("travel > public transportation services", "Transport");
        m.insert("travel", "Travel");
        m.insert("transportation", "Transport");
        m.insert("recreation > gyms and fitness centers", "Health");
        m.insert("recreation", "Entertainment");
        m.insert("healthcare", "Health");
        m.insert("service > utilities", "Bills & Utilities");
        m.insert("service > telecommunication services", "Bills & Utilities");
        m.insert("payment > rent", "Housing");
        m.insert("transfer > deposit", "Income");
        m
    };
}

/// Resolves the assignment for a normalized draft. A category the caller
/// chose explicitly is kept verbatim (styled if it names a known category);
/// only the `"Uncategorized"` default runs through automatic assignment.
pub fn assignment_for(draft: &TransactionDraft) -> CategoryAssignment {
    if draft.category != CATEGORY_UNCATEGORIZED {
        return style_for(&draft.category);
    }
    categorize(
        &draft.transaction_type,
        draft.taxonomy.as_deref(),
        &draft.merchant,
    )
}

/// Assigns `{category, icon, color}` to a draft transaction.
///
/// Pure function: income is always `"Income"`, then the provider taxonomy
/// path (full path first, then the most general label), then keyword
/// matching over the merchant text, then the neutral fallback.
pub fn categorize(
    transaction_type: &str,
    taxonomy: Option<&[String]>,
    merchant: &str,
) -> CategoryAssignment {
    if transaction_type == TRANSACTION_TYPE_INCOME {
        return CategoryAssignment {
            category: CATEGORY_INCOME.to_string(),
            icon: INCOME_ICON.to_string(),
            color: INCOME_COLOR.to_string(),
        };
    }

    if let Some(path) = taxonomy.filter(|p| !p.is_empty()) {
        let joined = path
            .iter()
            .map(|label| label.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join(" > ");
        let first = path[0].trim().to_lowercase();

        if let Some(name) = TAXONOMY_MAP
            .get(joined.as_str())
            .or_else(|| TAXONOMY_MAP.get(first.as_str()))
        {
            return style_for(name);
        }
    }

    let haystack = merchant.to_lowercase();
    for entry in CATEGORY_TABLE {
        if entry.keywords.iter().any(|kw| haystack.contains(kw)) {
            return CategoryAssignment {
                category: entry.name.to_string(),
                icon: entry.icon.to_string(),
                color: entry.color.to_string(),
            };
        }
    }

    CategoryAssignment {
        category: CATEGORY_UNCATEGORIZED.to_string(),
        icon: NEUTRAL_ICON.to_string(),
        color: NEUTRAL_COLOR.to_string(),
    }
}

fn style_for(name: &str) -> CategoryAssignment {
    if name == CATEGORY_INCOME {
        return CategoryAssignment {
            category: CATEGORY_INCOME.to_string(),
            icon: INCOME_ICON.to_string(),
            color: INCOME_COLOR.to_string(),
        };
    }
    CATEGORY_TABLE
        .iter()
        .find(|entry| entry.name == name)
        .map(|entry| CategoryAssignment {
            category: entry.name.to_string(),
            icon: entry.icon.to_string(),
            color: entry.color.to_string(),
        })
        .unwrap_or(CategoryAssignment {
            category: name.to_string(),
            icon: NEUTRAL_ICON.to_string(),
            color: NEUTRAL_COLOR.to_string(),
        })
}

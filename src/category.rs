//! The fixed category lists and the sign convention for amounts.
//!
//! Amounts are stored signed: income categories are positive, expense
//! categories are negative. The sign is normalized at the write boundary so
//! the aggregation code never has to consult the category lists again.

use rust_decimal::Decimal;

/// Categories whose transactions count as income.
pub const INCOME_CATEGORIES: [&str; 5] = [
    "Salary",
    "Bonus",
    "Interest",
    "Investment Income",
    "Other Income",
];

/// Categories whose transactions count as expenses.
pub const EXPENSE_CATEGORIES: [&str; 9] = [
    "Food",
    "Rent",
    "Utilities",
    "Transport",
    "Shopping",
    "Health",
    "Entertainment",
    "Travel",
    "Misc",
];

/// Whether `category` is one of the income categories.
pub fn is_income_category(category: &str) -> bool {
    INCOME_CATEGORIES.contains(&category)
}

/// Force the sign of `amount` to match the convention for `category`.
///
/// Users enter magnitudes in the form, so "50" in the Food category becomes
/// -50 and "50" in the Salary category stays 50. Anything not in the income
/// list counts as an expense, so categories created before a list change
/// still aggregate sensibly.
pub fn normalize_amount(amount: Decimal, category: &str) -> Decimal {
    if is_income_category(category) {
        amount.abs()
    } else {
        -amount.abs()
    }
}

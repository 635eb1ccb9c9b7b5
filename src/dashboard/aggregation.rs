//! Transaction data aggregation and transformation for charts.
//!
//! Provides functions to bucket transactions by calendar month, calculate the
//! running balance, group spending by category, and format data for chart
//! display. All arithmetic is exact decimal arithmetic.

use std::collections::HashMap;

use rust_decimal::Decimal;
use time::Date;

use crate::{investment::Investment, transaction::Transaction};

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct MonthlySummary {
    /// The month, as a date with the day set to 1.
    pub month: Date,
    /// The sum of income amounts for the month.
    pub income: Decimal,
    /// The sum of expense magnitudes for the month.
    pub expenses: Decimal,
}

/// Total spending for one category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct CategoryTotal {
    /// The category name.
    pub category: String,
    /// The sum of expense magnitudes for the category.
    pub total: Decimal,
}

fn month_of(date: Date) -> Date {
    // Day 1 is valid for every month.
    date.replace_day(1).unwrap_or(date)
}

/// Calculates the running balance at the end of each month.
///
/// Each point is the cumulative sum of all transaction amounts up to and
/// including that month, so the final point equals the overall balance.
///
/// # Returns
/// Month/balance pairs in chronological order.
pub(super) fn balance_series(transactions: &[Transaction]) -> Vec<(Date, Decimal)> {
    let mut totals: HashMap<Date, Decimal> = HashMap::new();

    for transaction in transactions {
        *totals
            .entry(month_of(transaction.date))
            .or_insert(Decimal::ZERO) += transaction.amount;
    }

    let mut months: Vec<Date> = totals.keys().copied().collect();
    months.sort();

    let mut cumulative = Decimal::ZERO;
    months
        .into_iter()
        .map(|month| {
            cumulative += totals[&month];
            (month, cumulative)
        })
        .collect()
}

/// Aggregates income and expense totals by calendar month.
///
/// # Returns
/// One [MonthlySummary] per month with data, in chronological order.
pub(super) fn income_expense_series(transactions: &[Transaction]) -> Vec<MonthlySummary> {
    let mut totals: HashMap<Date, (Decimal, Decimal)> = HashMap::new();

    for transaction in transactions {
        let entry = totals
            .entry(month_of(transaction.date))
            .or_insert((Decimal::ZERO, Decimal::ZERO));

        if transaction.amount >= Decimal::ZERO {
            entry.0 += transaction.amount;
        } else {
            entry.1 += transaction.amount.abs();
        }
    }

    let mut months: Vec<Date> = totals.keys().copied().collect();
    months.sort();

    months
        .into_iter()
        .map(|month| {
            let (income, expenses) = totals[&month];
            MonthlySummary {
                month,
                income,
                expenses,
            }
        })
        .collect()
}

/// Sums spending by category.
///
/// Only expenses (negative amounts) are counted; the totals are magnitudes.
/// Categories appear in the order their first expense appears in
/// `transactions`, so ties in the concentration insight resolve to the
/// earliest category.
pub(super) fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index_by_category: HashMap<&str, usize> = HashMap::new();

    for transaction in transactions {
        if transaction.amount >= Decimal::ZERO {
            continue;
        }

        match index_by_category.get(transaction.category.as_str()) {
            Some(&index) => totals[index].total += transaction.amount.abs(),
            None => {
                index_by_category.insert(transaction.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    category: transaction.category.clone(),
                    total: transaction.amount.abs(),
                });
            }
        }
    }

    totals
}

/// Pairs each holding's name with its value, in insertion order.
pub(super) fn asset_allocation(investments: &[Investment]) -> Vec<(String, Decimal)> {
    investments
        .iter()
        .map(|investment| (investment.name.clone(), investment.value))
        .collect()
}

/// Formats month dates as three-letter abbreviations.
///
/// # Returns
/// Vector of month names as 3-letter strings (e.g., "Jan", "Feb").
pub(super) fn format_month_labels(months: &[Date]) -> Vec<String> {
    use time::Month;
    let month_to_str = |date: &Date| {
        match date.month() {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
        .to_string()
    };

    months.iter().map(month_to_str).collect()
}

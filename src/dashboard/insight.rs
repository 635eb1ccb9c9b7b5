//! Spending insights derived from the aggregated data.

use rust_decimal::Decimal;

use crate::dashboard::{aggregation::CategoryTotal, summary::FinancialSummary};

/// The share of total spending taken by the largest category.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SpendingConcentration {
    /// The category with the highest spending.
    pub category: String,
    /// The category's fraction of total spending, in 0..=1.
    pub share: Decimal,
}

impl SpendingConcentration {
    /// Whether the top category takes more than half of total spending.
    ///
    /// Exactly half does not count as concentrated.
    pub(super) fn is_high(&self) -> bool {
        self.share > Decimal::new(5, 1)
    }
}

/// Finds the category with the highest spending and its share of the total.
///
/// Returns `None` when there is no spending at all. Ties resolve to the
/// category that appears first in `totals`.
pub(super) fn spending_concentration(totals: &[CategoryTotal]) -> Option<SpendingConcentration> {
    let total: Decimal = totals.iter().map(|category| category.total).sum();

    if total <= Decimal::ZERO {
        return None;
    }

    let top = totals
        .iter()
        .reduce(|max, category| if category.total > max.total { category } else { max })?;

    Some(SpendingConcentration {
        category: top.category.clone(),
        share: top.total / total,
    })
}

/// Builds the list of tips shown in the dashboard insight panel.
pub(super) fn insight_tips(
    summary: &FinancialSummary,
    concentration: Option<&SpendingConcentration>,
) -> Vec<String> {
    let mut tips = Vec::new();

    if let Some(concentration) = concentration {
        let share_percent = (concentration.share * Decimal::ONE_HUNDRED).round();

        if concentration.is_high() {
            tips.push(format!(
                "High concentration in {} ({share_percent}% of spending). \
                Consider spreading your spending out.",
                concentration.category
            ));
        } else {
            tips.push(format!(
                "Balanced spending. Your largest category is {} ({share_percent}%).",
                concentration.category
            ));
        }
    }

    if summary.income > Decimal::ZERO {
        let rate = ((summary.balance / summary.income) * Decimal::ONE_HUNDRED)
            .round()
            .max(Decimal::ZERO);
        tips.push(format!("Savings rate this period: {rate}%."));
    }

    if summary.balance < Decimal::ZERO {
        tips.push("Balance is negative. Reduce discretionary spending this week.".to_owned());
    }

    if tips.is_empty() {
        tips.push("Add a few transactions to unlock insights.".to_owned());
    }

    tips
}

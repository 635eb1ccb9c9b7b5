//! The financial summary and savings goal calculations, plus their views.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CATEGORY_BADGE_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
    transaction::Transaction,
};

/// Overall income, spending and balance across a set of transactions.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct FinancialSummary {
    /// The sum of income amounts.
    pub income: Decimal,
    /// The sum of expense magnitudes.
    pub expenses: Decimal,
    /// Income minus expenses. Negative when spending exceeds income.
    pub balance: Decimal,
}

impl FinancialSummary {
    pub(super) fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut income = Decimal::ZERO;
        let mut expenses = Decimal::ZERO;

        for transaction in transactions {
            if transaction.amount >= Decimal::ZERO {
                income += transaction.amount;
            } else {
                expenses += transaction.amount.abs();
            }
        }

        Self {
            income,
            expenses,
            balance: income - expenses,
        }
    }
}

/// How far the balance has progressed towards the savings goal, as a
/// percentage clamped to 0..=100.
pub(super) fn goal_progress(balance: Decimal, goal: Decimal) -> Decimal {
    if goal <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (balance / goal * Decimal::ONE_HUNDRED)
        .round_dp(1)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

pub(super) fn summary_cards(summary: &FinancialSummary) -> Markup {
    let card = |title: &str, amount: Decimal, amount_style: &str| {
        html!(
            div class="flex-1 bg-white dark:bg-gray-800 rounded-lg shadow p-4"
            {
                p class="text-sm text-gray-500 dark:text-gray-400" { (title) }
                p class={"text-2xl font-bold " (amount_style)} { (format_currency(amount)) }
            }
        )
    };

    let balance_style = if summary.balance < Decimal::ZERO {
        "text-red-600 dark:text-red-400"
    } else {
        "text-gray-900 dark:text-white"
    };

    html!(
        section id="summary" class="w-full flex flex-col sm:flex-row gap-4 mb-4"
        {
            (card("Income", summary.income, "text-green-600 dark:text-green-400"))
            (card("Expenses", summary.expenses, "text-red-600 dark:text-red-400"))
            (card("Balance", summary.balance, balance_style))
        }
    )
}

pub(super) fn goal_card(goal: Decimal, progress: Decimal) -> Markup {
    html!(
        section id="savings-goal" class="w-full bg-white dark:bg-gray-800 rounded-lg shadow p-4 mb-4"
        {
            div class="flex items-center justify-between mb-2"
            {
                h3 class="font-semibold" { "Savings Goal" }
                span class="text-sm text-gray-500 dark:text-gray-400"
                {
                    (format_currency(goal)) " · " (progress) "%"
                }
            }

            div class="w-full bg-gray-200 rounded-full h-2.5 dark:bg-gray-700 mb-4"
            {
                div
                    class="bg-blue-600 h-2.5 rounded-full"
                    style={"width: " (progress) "%"}
                {}
            }

            form
                class="flex items-end gap-4"
                hx-post=(endpoints::GOAL_API)
                hx-target-error="#alert-container"
            {
                div
                {
                    label for="goal" class=(FORM_LABEL_STYLE) { "New goal" }
                    div class="input-wrapper"
                    {
                        input
                            type="number"
                            name="goal"
                            id="goal"
                            class=(FORM_TEXT_INPUT_STYLE)
                            min="0.01"
                            step="0.01"
                            value=(goal)
                            required;
                    }
                }

                button
                    type="submit"
                    class={(BUTTON_PRIMARY_STYLE) " w-auto"}
                {
                    "Update"
                }
            }
        }
    )
}

pub(super) fn insight_panel(tips: &[String]) -> Markup {
    html!(
        @if !tips.is_empty() {
            section id="insights" class="w-full bg-white dark:bg-gray-800 rounded-lg shadow p-4 mb-4"
            {
                h3 class="font-semibold mb-2" { "Insights" }

                ul class="list-disc list-inside space-y-1 text-sm text-gray-700 dark:text-gray-300"
                {
                    @for tip in tips {
                        li { (tip) }
                    }
                }
            }
        }
    )
}

pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html!(
        section id="recent-transactions" class="w-full relative overflow-x-auto shadow-md sm:rounded-lg mb-4"
        {
            table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
            {
                caption
                    class="p-4 text-lg font-semibold text-left rtl:text-right
                        text-gray-900 bg-white dark:text-white dark:bg-gray-800"
                {
                    "Recent Transactions"
                }

                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td class=(TABLE_CELL_STYLE) { (transaction.date) }
                            td class=(TABLE_CELL_STYLE) { (transaction.description) }
                            td class=(TABLE_CELL_STYLE)
                            {
                                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
                            }
                            td class=(TABLE_CELL_STYLE) { (format_currency(transaction.amount)) }
                        }
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::transaction::Transaction;

    use super::{FinancialSummary, goal_progress};

    fn transaction(amount: Decimal) -> Transaction {
        Transaction {
            id: 0,
            amount,
            date: date!(2024 - 01 - 15),
            category: "Misc".to_owned(),
            description: String::new(),
        }
    }

    #[test]
    fn summary_splits_income_and_expenses() {
        let transactions = vec![
            transaction(Decimal::new(1000, 0)),
            transaction(Decimal::new(-400, 0)),
            transaction(Decimal::new(-100, 0)),
        ];

        let summary = FinancialSummary::from_transactions(&transactions);

        assert_eq!(summary.income, Decimal::new(1000, 0));
        assert_eq!(summary.expenses, Decimal::new(500, 0));
        assert_eq!(summary.balance, Decimal::new(500, 0));
    }

    #[test]
    fn summary_balance_can_be_negative() {
        let transactions = vec![
            transaction(Decimal::new(100, 0)),
            transaction(Decimal::new(-400, 0)),
        ];

        let summary = FinancialSummary::from_transactions(&transactions);

        assert_eq!(summary.balance, Decimal::new(-300, 0));
    }

    #[test]
    fn goal_progress_is_a_percentage() {
        assert_eq!(
            goal_progress(Decimal::new(2500, 0), Decimal::new(5000, 0)),
            Decimal::new(50, 0)
        );
    }

    #[test]
    fn goal_progress_clamps_to_one_hundred() {
        assert_eq!(
            goal_progress(Decimal::new(6000, 0), Decimal::new(5000, 0)),
            Decimal::ONE_HUNDRED
        );
    }

    #[test]
    fn goal_progress_clamps_negative_balance_to_zero() {
        assert_eq!(
            goal_progress(Decimal::new(-100, 0), Decimal::new(5000, 0)),
            Decimal::ZERO
        );
    }
}

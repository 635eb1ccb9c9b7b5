//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for financial data:
//! - **Balance Chart**: Running balance at the end of each month
//! - **Income vs Expenses Chart**: Monthly income and expense totals
//! - **Spending Chart**: Doughnut of spending by category
//! - **Allocation Chart**: Doughnut of investment holdings
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Line, Pie, bar},
};
use maud::PreEscaped;
use rust_decimal::prelude::ToPrimitive;
use time::Date;

use crate::{
    dashboard::aggregation::{CategoryTotal, MonthlySummary, format_month_labels},
    html::HeadElement,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A line chart of the running balance at the end of each month.
///
/// The decimal amounts are converted to `f64` here, at the display boundary.
pub(super) fn balance_chart(series: &[(Date, rust_decimal::Decimal)]) -> Chart {
    let months: Vec<Date> = series.iter().map(|(month, _)| *month).collect();
    let labels = format_month_labels(&months);
    let values: Vec<f64> = series
        .iter()
        .map(|(_, balance)| balance.to_f64().unwrap_or(0.0))
        .collect();

    Chart::new()
        .title(Title::new().text("Balance").subtext("End of each month"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Line::new().name("Balance").data(values))
}

/// A grouped bar chart of income and expense totals per month.
pub(super) fn income_expense_chart(series: &[MonthlySummary]) -> Chart {
    let months: Vec<Date> = series.iter().map(|summary| summary.month).collect();
    let labels = format_month_labels(&months);
    let income: Vec<f64> = series
        .iter()
        .map(|summary| summary.income.to_f64().unwrap_or(0.0))
        .collect();
    let expenses: Vec<f64> = series
        .iter()
        .map(|summary| summary.expenses.to_f64().unwrap_or(0.0))
        .collect();

    Chart::new()
        .title(Title::new().text("Income vs Expenses").subtext("Per month"))
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("10%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Income").data(income))
        .series(bar::Bar::new().name("Expenses").data(expenses))
}

/// A doughnut chart of spending by category.
pub(super) fn spending_chart(totals: &[CategoryTotal]) -> Chart {
    let data: Vec<(f64, &str)> = totals
        .iter()
        .map(|category| {
            (
                category.total.to_f64().unwrap_or(0.0),
                category.category.as_str(),
            )
        })
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by Category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(Pie::new().name("Spending").radius(vec!["40%", "70%"]).data(data))
}

/// A doughnut chart of the investment holdings by value.
pub(super) fn allocation_chart(allocation: &[(String, rust_decimal::Decimal)]) -> Chart {
    let data: Vec<(f64, &str)> = allocation
        .iter()
        .map(|(name, value)| (value.to_f64().unwrap_or(0.0), name.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Asset Allocation"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(Pie::new().name("Holdings").radius(vec!["40%", "70%"]).data(data))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

use std::path::Path;

use chrono::Local;
use rust_decimal::Decimal;

use crate::category::CategoryRegistry;
use crate::fmt::{column, dot_pad, money};
use crate::models::{Category, Transaction};
use crate::reports;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const BANNER_WIDTH: usize = 92;

/// Assemble the full report text: header, per-category transaction detail,
/// year-to-date summary, one summary per month with activity, and the
/// monthly-average summary.
pub fn render(
    registry: &CategoryRegistry,
    journal: &[Transaction],
    category_path: &Path,
    journal_path: &Path,
    report_path: &Path,
) -> String {
    let mut out = String::new();
    out.push_str("Cashflow detailed output - journal transactions for each category code\n");
    out.push_str(&format!(
        "\nReport generated on {}, using files:\n",
        Local::now().format("%m/%d/%Y, %H:%M")
    ));
    out.push_str(&format!("   Category: {}\n", absolute(category_path)));
    out.push_str(&format!("   Journal:  {}\n", absolute(journal_path)));
    out.push_str(&format!("   Report:   {}\n", absolute(report_path)));

    out.push_str(&format_detail(registry, journal));

    let banner = format!("\n{}\n", "#".repeat(BANNER_WIDTH));
    out.push_str(&banner);
    out.push_str(&format_ytd_summary(registry));

    let active = reports::active_months(registry);
    for (m, is_active) in active.iter().enumerate() {
        if *is_active {
            out.push_str(&banner);
            out.push_str(&format_month_summary(registry, m));
        }
    }

    let months = active.iter().filter(|&&a| a).count();
    out.push_str(&banner);
    out.push_str(&format_average_summary(registry, months));
    out
}

/// Every category, empty ones included, with its transactions sorted by date.
fn format_detail(registry: &CategoryRegistry, journal: &[Transaction]) -> String {
    let mut out = String::new();
    for node in registry.nodes() {
        out.push_str(&format!(
            "\nCategory {} {}    Transactions: {},  Nested: {},  Total: {}\n",
            node.code,
            node.description,
            money(node.direct_total),
            money(node.nested_total),
            money(node.combined_total())
        ));
        if node.transactions.is_empty() {
            continue;
        }
        out.push('\n');
        for idx in reports::sorted_transactions(&node.transactions, journal) {
            let txn = &journal[idx];
            out.push_str(&format!(
                "    {} {} {:>10} {}\n",
                txn.date,
                dot_pad(&txn.description, node.max_description_width),
                money(txn.amount),
                txn.type_tag
            ));
        }
    }
    out
}

fn format_ytd_summary(registry: &CategoryRegistry) -> String {
    let mut out = String::new();
    out.push_str("\nYear-to-date summary - categories only (all-zero categories omitted)\n");
    out.push_str(&summary_header());
    for node in registry.nodes() {
        if node.combined_total().is_zero() {
            continue;
        }
        out.push_str(&summary_row(node, node.direct_total, node.nested_total));
    }
    out
}

fn format_month_summary(registry: &CategoryRegistry, month: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("\nSummary for {}\n", MONTH_NAMES[month]));
    out.push_str(&summary_header());
    for node in registry.nodes() {
        if node.combined_monthly(month).is_zero() {
            continue;
        }
        out.push_str(&summary_row(
            node,
            node.direct_monthly[month],
            node.nested_monthly[month],
        ));
    }
    out
}

/// Year-to-date totals divided by the number of months with activity. Months
/// without transactions (future months of a year in progress) do not dilute
/// the averages.
fn format_average_summary(registry: &CategoryRegistry, months: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "\nMonthly average over {months} month{}\n",
        if months == 1 { "" } else { "s" }
    ));
    out.push_str(&format!("{:>71}{:>11}\n", "Total", "Average"));
    if months == 0 {
        return out;
    }
    let divisor = Decimal::from(months as i64);
    for node in registry.nodes() {
        let total = node.combined_total();
        if total.is_zero() {
            continue;
        }
        out.push_str(&format!(
            "Category {} {}  {}  {}\n",
            dot_pad(&node.code, 10),
            dot_pad(&node.description, 40),
            column(total, 9),
            column(total / divisor, 9)
        ));
    }
    out
}

fn summary_header() -> String {
    format!("{:>71}{:>11}{:>11}\n", "Transactions", "Nested", "Total")
}

fn summary_row(node: &Category, direct: Decimal, nested: Decimal) -> String {
    format!(
        "Category {} {}  {}  {}  {}\n",
        dot_pad(&node.code, 10),
        dot_pad(&node.description, 40),
        column(direct, 9),
        column(nested, 9),
        column(direct + nested, 9)
    )
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::load_journal;
    use std::path::PathBuf;

    fn rendered() -> String {
        let mut reg = CategoryRegistry::from_text(
            "1 Income\n1.1 Salary\n2 Expenses\n2.1 Housing\n",
            "cats.txt",
        )
        .unwrap();
        let journal = load_journal(
            "3/9, Paycheck, 1000.00, dep, 1.1\n\
             3/10, Rent, 800.00, chk, 2.1\n",
            "journal.txt",
            2015,
            &mut reg,
        )
        .unwrap();
        reports::aggregate(&mut reg);
        render(
            &reg,
            &journal,
            &PathBuf::from("cats.txt"),
            &PathBuf::from("journal.txt"),
            &PathBuf::from("report.txt"),
        )
    }

    #[test]
    fn test_detail_shows_all_categories_and_transactions() {
        let out = rendered();
        assert!(out.contains(
            "Category 1 Income    Transactions: $0.00,  Nested: $1,000.00,  Total: $1,000.00"
        ));
        assert!(out.contains(
            "Category 1.1 Salary    Transactions: $1,000.00,  Nested: $0.00,  Total: $1,000.00"
        ));
        assert!(out.contains("    03/09/2015 Paycheck  $1,000.00 dep"));
        assert!(out.contains("    03/10/2015 Rent    $800.00 chk"));
    }

    #[test]
    fn test_ytd_summary_omits_zero_categories() {
        let out = rendered();
        let ytd = out
            .split("Year-to-date summary")
            .nth(1)
            .unwrap()
            .split('#')
            .next()
            .unwrap();
        assert!(ytd.contains("Category 1........."));
        assert!(ytd.contains("Category 2.1......."));
        // Every summary row has a nonzero Total column; no category outside
        // the four seeded ones appears.
        assert_eq!(ytd.matches("Category ").count(), 4);
    }

    #[test]
    fn test_only_active_months_get_a_summary() {
        let out = rendered();
        assert!(out.contains("Summary for March"));
        for name in MONTH_NAMES.iter().filter(|&&n| n != "March") {
            assert!(!out.contains(&format!("Summary for {name}")), "{name}");
        }
    }

    #[test]
    fn test_average_uses_active_month_count() {
        let out = rendered();
        assert!(out.contains("Monthly average over 1 month\n"));
        // One active month, so average equals the total.
        assert!(out.contains("  1000.00    1000.00"));
    }
}

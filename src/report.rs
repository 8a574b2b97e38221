//! Totals the spending and formats the dashboard printed to the terminal.

use std::fmt::Display;

use crate::{
    forecast::forecast_next,
    transaction::{Category, Transaction},
};

/// The monthly budget used when none is configured.
pub const DEFAULT_MONTHLY_BUDGET: u64 = 10_000;

/// How the spending compares to the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetSummary {
    /// The sum of all transaction amounts.
    pub total_spent: u64,
    /// The budget the spending is checked against.
    pub budget: u64,
}

impl BudgetSummary {
    /// Sum the amounts of `transactions`.
    ///
    /// The total saturates at `u64::MAX` rather than overflowing.
    pub fn new(transactions: &[Transaction], budget: u64) -> Self {
        let total_spent = transactions
            .iter()
            .fold(0u64, |total, transaction| total.saturating_add(transaction.amount));

        Self {
            total_spent,
            budget,
        }
    }

    /// Whether more than the budget was spent.
    ///
    /// Spending exactly the budget is within budget.
    pub fn is_exceeded(&self) -> bool {
        self.total_spent > self.budget
    }
}

/// The total spent in one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryTotal {
    /// The spending category.
    pub category: Category,
    /// The sum of the amounts in the category.
    pub total: u64,
}

/// Sum the transaction amounts per category.
///
/// Categories appear in the order they first occur in `transactions`, and
/// categories without transactions are left out.
pub fn category_totals(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for transaction in transactions {
        match totals
            .iter_mut()
            .find(|total| total.category == transaction.category)
        {
            Some(total) => total.total = total.total.saturating_add(transaction.amount),
            None => totals.push(CategoryTotal {
                category: transaction.category,
                total: transaction.amount,
            }),
        }
    }

    totals
}

/// The dashboard printed after the transactions have been collected.
///
/// Lists each transaction, the budget check and, when there are at least two
/// transactions, the predicted next expense.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<'a> {
    transactions: &'a [Transaction],
    summary: BudgetSummary,
    forecast: Option<f64>,
}

impl<'a> Report<'a> {
    /// Create the report for `transactions` checked against `budget`.
    pub fn new(transactions: &'a [Transaction], budget: u64) -> Self {
        let amounts: Vec<u64> = transactions
            .iter()
            .map(|transaction| transaction.amount)
            .collect();

        Self {
            transactions,
            summary: BudgetSummary::new(transactions, budget),
            forecast: forecast_next(&amounts),
        }
    }

    /// The budget check.
    pub fn summary(&self) -> BudgetSummary {
        self.summary
    }

    /// The predicted next expense, if there were enough transactions.
    pub fn forecast(&self) -> Option<f64> {
        self.forecast
    }
}

/// Round `value` to two decimal places.
///
/// Printed with `{:?}`, whole numbers keep one decimal place, e.g. `400.0`,
/// and trailing zeros are dropped, e.g. `12.5`.
fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Display for Report<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f)?;
        writeln!(f, "===== SMART EXPENSE DASHBOARD =====")?;
        writeln!(f)?;

        for transaction in self.transactions {
            writeln!(
                f,
                "{:<10} | Rs.{:>6} | {}",
                transaction.merchant, transaction.amount, transaction.category
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Total Spent: {}", self.summary.total_spent)?;
        writeln!(f, "Budget: {}", self.summary.budget)?;

        if self.summary.is_exceeded() {
            writeln!(f, "⚠ Budget Exceeded!")?;
        } else {
            writeln!(f, "✅ Within Budget")?;
        }

        if let Some(forecast) = self.forecast {
            writeln!(f)?;
            writeln!(f, "Predicted Next Expense: {:?}", round_to_cents(forecast))?;
        }

        Ok(())
    }
}

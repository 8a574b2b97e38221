//! Transactions parsed from notification emails.
//!
//! This module contains:
//! - The `Transaction` model
//! - The fixed spending categories and the merchant lookup that assigns them
//! - The pattern matching that pulls an amount and merchant out of email text

mod category;
mod extract;

pub use category::{Category, categorize};
pub use extract::{UNKNOWN_MERCHANT, extract_transaction};

/// A spending event found in an email.
///
/// To create a new `Transaction`, use [Transaction::new], which derives the
/// category from the merchant name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The amount spent in whole currency units.
    pub amount: u64,
    /// The merchant the money was spent at, or [UNKNOWN_MERCHANT].
    pub merchant: String,
    /// The spending category, derived from `merchant`.
    pub category: Category,
}

impl Transaction {
    /// Create a new transaction and categorize it by its merchant.
    pub fn new(amount: u64, merchant: &str) -> Self {
        Self {
            amount,
            merchant: merchant.to_owned(),
            category: categorize(merchant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Transaction};

    #[test]
    fn new_derives_category_from_merchant() {
        let transaction = Transaction::new(450, "Zomato");

        assert_eq!(
            transaction,
            Transaction {
                amount: 450,
                merchant: "Zomato".to_owned(),
                category: Category::Food,
            }
        );
    }

    #[test]
    fn new_falls_back_to_others_for_unknown_merchant() {
        let transaction = Transaction::new(99, "Unknown");

        assert_eq!(transaction.category, Category::Others);
    }
}

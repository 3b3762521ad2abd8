use serde::{Deserialize, Serialize};

use super::transaction::{Transaction, TransactionType};

// ---------------------------------------------------------------------------
// Summary — Income/outcome totals over a list of transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub income: f64,
    pub outcome: f64,
    /// `income - outcome`
    pub total: f64,
}

impl Summary {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let (income, outcome) =
            transactions
                .iter()
                .fold((0.0, 0.0), |(income, outcome), tx| match tx.kind {
                    TransactionType::Income => (income + tx.price, outcome),
                    TransactionType::Outcome => (income, outcome + tx.price),
                });

        Self {
            income,
            outcome,
            total: income - outcome,
        }
    }
}

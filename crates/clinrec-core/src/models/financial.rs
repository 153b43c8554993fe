//! Financial transaction models.

use serde::{Deserialize, Serialize};

use super::{new_id, now_iso};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

/// Cashflow state. `paid_at` is only ever set while the status is paid.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Paid,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    DebitCard,
    Cash,
    Transfer,
}

/// A financial transaction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    #[serde(default)]
    pub category: String,
    pub amount: f64,
    /// Legacy base date, kept for backward compatibility; the window
    /// queries prefer `due_date`.
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub status: TransactionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    // due_date and paid_at serialize as explicit nulls: a cleared payment
    // date is data, not an absent field.
    pub due_date: Option<String>,
    pub paid_at: Option<String>,
}

/// Caller-supplied fields for a new transaction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionInput {
    pub kind: TransactionType,
    pub amount: f64,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    pub patient_id: Option<String>,
    pub status: Option<TransactionStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub due_date: Option<String>,
    pub paid_at: Option<String>,
}

impl Default for TransactionType {
    fn default() -> Self {
        TransactionType::Income
    }
}

impl Transaction {
    /// Build a transaction from caller input.
    ///
    /// A transaction with no status was settled on the spot: it is created
    /// `paid`, with `paid_at` taken from the base date. A pending one keeps
    /// `paid_at` null until it is actually paid.
    pub fn from_input(input: TransactionInput) -> Self {
        let now = now_iso();
        let status = input.status.unwrap_or(TransactionStatus::Paid);
        let date = input.date.unwrap_or_else(|| now.clone());
        let due_date = input.due_date.unwrap_or_else(|| date.clone());
        let paid_at = input.paid_at.or_else(|| {
            if status == TransactionStatus::Paid {
                Some(date.clone())
            } else {
                None
            }
        });
        Self {
            id: new_id(),
            kind: input.kind,
            category: input.category.unwrap_or_else(|| "Geral".to_string()),
            amount: input.amount,
            date,
            description: input.description,
            patient_id: input.patient_id,
            status,
            payment_method: input.payment_method,
            due_date: Some(due_date),
            paid_at,
        }
    }
}

/// Aggregated monthly (or all-time) balance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Balance {
    pub total_income: f64,
    pub total_expense: f64,
    /// Sum of pending amounts in the window; never part of income/expense.
    pub pending_forecast: f64,
    pub balance: f64,
}

/// Filters for transaction listings.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    pub category: Option<String>,
    pub patient_id: Option<String>,
    pub status: Option<TransactionStatus>,
    pub month: Option<u32>,
    pub year: Option<i32>,
}

/// Window filter for the balance query. No month/year means all-time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BalanceFilter {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

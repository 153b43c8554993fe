//! Financial transaction operations and balance aggregation.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

use super::timeline::parse_date;
use super::{Database, FindOptions, Selector, SortOrder, StoreError, StoreResult};
use crate::models::{Balance, BalanceFilter, Transaction, TransactionFilter, TransactionInput};
use crate::schema;

/// Half-open window `[first of month, first of next month)`.
fn month_window(month: u32, year: i32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .and_hms_opt(0, 0, 0)?
        .and_utc();
    Some((start, end))
}

/// Window check against `due_date` when present, else the legacy `date`.
/// Records with no parseable date never fall inside a month window.
fn in_window(doc: &Value, window: Option<(DateTime<Utc>, DateTime<Utc>)>) -> bool {
    let Some((start, end)) = window else {
        return true;
    };
    let base = doc
        .get("due_date")
        .and_then(Value::as_str)
        .or_else(|| doc.get("date").and_then(Value::as_str));
    match base.and_then(parse_date) {
        Some(date) => date >= start && date < end,
        None => false,
    }
}

impl Database {
    /// Record a transaction.
    pub fn add_transaction(&self, input: TransactionInput) -> StoreResult<Transaction> {
        let transaction = Transaction::from_input(input);
        self.insert_doc(schema::FINANCIAL, serde_json::to_value(&transaction)?)?;
        Ok(transaction)
    }

    /// List transactions matching the filter, newest first.
    pub fn transactions(&self, filter: &TransactionFilter) -> StoreResult<Vec<Transaction>> {
        let mut selector = Selector::new();
        if let Some(kind) = filter.kind {
            selector = selector.eq("type", serde_json::to_value(kind)?);
        }
        if let Some(category) = &filter.category {
            selector = selector.eq("category", category.as_str());
        }
        if let Some(patient_id) = &filter.patient_id {
            selector = selector.eq("patient_id", patient_id.as_str());
        }
        if let Some(status) = filter.status {
            selector = selector.eq("status", serde_json::to_value(status)?);
        }

        let docs = self.find_docs(
            schema::FINANCIAL,
            &selector,
            &FindOptions::sorted("date", SortOrder::Desc),
        )?;

        let window = match (filter.month, filter.year) {
            (Some(month), Some(year)) => month_window(month, year),
            _ => None,
        };

        docs.into_iter()
            .filter(|doc| in_window(doc, window))
            .map(|doc| serde_json::from_value(doc).map_err(Into::into))
            .collect()
    }

    /// Aggregate the balance over a month window (or all-time).
    ///
    /// Pending amounts count toward the forecast only; cancelled records
    /// count toward nothing.
    pub fn balance(&self, filter: &BalanceFilter) -> StoreResult<Balance> {
        let window = match (filter.month, filter.year) {
            (Some(month), Some(year)) => month_window(month, year),
            _ => None,
        };

        let docs = self.find_docs(schema::FINANCIAL, &Selector::new(), &FindOptions::default())?;

        let mut balance = Balance::default();
        for doc in docs.iter().filter(|doc| in_window(doc, window)) {
            let amount = doc.get("amount").and_then(Value::as_f64).unwrap_or(0.0);
            let status = doc.get("status").and_then(Value::as_str);
            match status {
                Some("pending") => balance.pending_forecast += amount,
                Some("paid") => match doc.get("type").and_then(Value::as_str) {
                    Some("income") => balance.total_income += amount,
                    Some("expense") => balance.total_expense += amount,
                    _ => {}
                },
                _ => {}
            }
        }
        balance.balance = balance.total_income - balance.total_expense;
        Ok(balance)
    }

    /// Patch a transaction, enforcing the cashflow state machine:
    /// a move to `paid` stamps `paid_at` when the patch carries none, and a
    /// move back to `pending` clears it.
    pub fn update_transaction(&self, id: &str, patch: Value) -> StoreResult<Transaction> {
        let mut patch = match patch {
            Value::Object(map) => map,
            _ => {
                return Err(StoreError::Validation {
                    collection: schema::FINANCIAL.to_string(),
                    field: "<patch>".to_string(),
                    message: "patch must be a JSON object".to_string(),
                })
            }
        };

        match patch.get("status").and_then(Value::as_str) {
            Some("paid") => {
                let has_paid_at = patch.get("paid_at").is_some_and(|v| !v.is_null());
                if !has_paid_at {
                    patch.insert(
                        "paid_at".to_string(),
                        Value::String(chrono::Utc::now().to_rfc3339()),
                    );
                }
            }
            Some("pending") => {
                patch.insert("paid_at".to_string(), Value::Null);
            }
            _ => {}
        }

        let doc = self.patch_doc(schema::FINANCIAL, id, Value::Object(patch))?;
        Ok(serde_json::from_value(doc)?)
    }

    /// Delete a transaction. Idempotent.
    pub fn delete_transaction(&self, id: &str) -> StoreResult<()> {
        self.remove_doc(schema::FINANCIAL, id)?;
        Ok(())
    }
}

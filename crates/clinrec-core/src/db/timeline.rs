//! Unified patient timeline across record types.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Database, FindOptions, Selector, StoreResult};
use crate::schema;

/// Source collection of a timeline entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TimelineSource {
    Exams,
    Prescriptions,
    LabExams,
}

/// One normalized entry in the patient timeline.
///
/// `date` is None when the source record carries no parseable date; such
/// entries sort after every dated one instead of floating to the top.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineEntry {
    pub collection: TimelineSource,
    pub date: Option<DateTime<Utc>>,
    pub data: Value,
}

pub(crate) fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

impl Database {
    /// Merge a patient's exams, prescriptions and lab exams into one list
    /// sorted by date descending. Entries with equal dates keep their
    /// per-source insertion order.
    pub fn patient_timeline(&self, patient_id: &str) -> StoreResult<Vec<TimelineEntry>> {
        let selector = Selector::new().eq("patient_id", patient_id);
        let sources: [(TimelineSource, &str, &[&str]); 3] = [
            (TimelineSource::Exams, schema::EXAMS, &["date"]),
            (TimelineSource::Prescriptions, schema::PRESCRIPTIONS, &["date"]),
            (
                TimelineSource::LabExams,
                schema::LAB_EXAMS,
                &["date", "created_at"],
            ),
        ];

        let mut entries = Vec::new();
        for (source, collection, date_fields) in sources {
            for doc in self.find_docs(collection, &selector, &FindOptions::default())? {
                let date = date_fields
                    .iter()
                    .find_map(|field| doc.get(*field).and_then(Value::as_str).and_then(parse_date));
                entries.push(TimelineEntry {
                    collection: source,
                    date,
                    data: doc,
                });
            }
        }

        entries.sort_by(|a, b| match (&a.date, &b.date) {
            (Some(a), Some(b)) => b.cmp(a),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        Ok(entries)
    }
}

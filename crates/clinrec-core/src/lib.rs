//! ClinRec Core Library
//!
//! Offline-first clinical record store for veterinary and human practices.
//!
//! # Architecture
//!
//! ```text
//!                  shared_store() / ClinicStore::open()
//!                                 │
//!                 ┌───────────────▼───────────────┐
//!                 │        Initialization         │
//!                 │  table setup → tag check →    │
//!                 │  migrations → seeding         │
//!                 └───────────────┬───────────────┘
//!                                 │
//!            ┌────────────────────┼────────────────────┐
//!            │                    │                    │
//!            ▼                    ▼                    ▼
//!     Typed facades        Document store         Aggregations
//!   (patients, exams,    (insert/find/patch/    (patient timeline,
//!    financial, ...)      remove + selectors)    monthly balance)
//! ```
//!
//! Documents are JSON bodies in one SQLite table, validated against the
//! [`schema`] registry on every write and upgraded by the [`migrate`]
//! chains when a database written by an older release is opened.
//!
//! # Modules
//!
//! - [`db`]: SQLite document store, typed facades and aggregation queries
//! - [`schema`]: collection declarations and write-time validation
//! - [`migrate`]: version-indexed migration chains
//! - [`models`]: domain types (Patient, Exam, Transaction, etc.)
//! - [`seed`]: bundled reference data and idempotent seeding

pub mod db;
pub mod migrate;
pub mod models;
pub mod schema;
pub mod seed;

// Re-export commonly used types
pub use db::{
    Database, FindOptions, Selector, SortOrder, StoreError, StoreResult, TimelineEntry,
    TimelineSource,
};
pub use models::{
    Anamnesis, Balance, BalanceFilter, Drug, Exam, ExamStatus, ImageRecord, LabExam, OphthalmoExam,
    Patient, PatientFilter, PracticeKind, PracticeScope, Prescription, Profile, ReferenceValue,
    Settings, Template, Transaction, TransactionFilter, TransactionStatus, TransactionType,
};

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Thread-safe store handle.
///
/// Operations run through one mutex: the store is built for a single
/// logical writer per process, so per-operation serialization replaces
/// fine-grained locking.
pub struct ClinicStore {
    db: Mutex<Database>,
}

impl ClinicStore {
    /// Open (or create) a store at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Ok(Self {
            db: Mutex::new(Database::open(path)?),
        })
    }

    /// Create an in-memory store (for testing).
    pub fn open_in_memory() -> StoreResult<Self> {
        Ok(Self {
            db: Mutex::new(Database::open_in_memory()?),
        })
    }

    /// Acquire the database for a batch of operations.
    pub fn db(&self) -> MutexGuard<'_, Database> {
        self.db.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

static SHARED: Mutex<Option<Arc<ClinicStore>>> = Mutex::new(None);

/// Get the process-wide store handle, initializing it on first call.
///
/// Callers arriving while another thread initializes block on the guard and
/// then observe the same instance, so migrations and seeding run exactly
/// once per process. A failed initialization caches nothing: the next call
/// retries instead of returning a poisoned handle.
///
/// The first successful call fixes the backing path; later calls return the
/// existing handle and ignore their argument (one database per deployment).
pub fn shared_store<P: AsRef<Path>>(path: P) -> StoreResult<Arc<ClinicStore>> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(store) = slot.as_ref() {
        return Ok(Arc::clone(store));
    }

    let store = Arc::new(ClinicStore::open(path)?);
    *slot = Some(Arc::clone(&store));
    Ok(store)
}

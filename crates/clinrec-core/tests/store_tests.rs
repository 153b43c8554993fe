//! Integration tests: persistence across reopen, startup migrations, and
//! end-to-end clinical flows.

use clinrec_core::models::{
    ExamInput, LabExamInput, PatientInput, PrescriptionInput, TransactionInput, TransactionStatus,
    TransactionType,
};
use clinrec_core::{
    db::Database, schema, seed, BalanceFilter, PatientFilter, TimelineSource, TransactionFilter,
};
use serde_json::{json, Value};

/// Write a document the way an older release would have: raw body at an
/// old schema version, bypassing the current validation path.
fn insert_raw(db: &Database, collection: &str, version: u32, body: Value) -> anyhow::Result<()> {
    db.conn().execute(
        "INSERT INTO documents (collection, id, schema_version, body) VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![
            collection,
            body["id"].as_str().expect("raw doc needs an id"),
            version,
            body.to_string()
        ],
    )?;
    Ok(())
}

#[test]
fn reopen_preserves_data_and_does_not_reseed() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("records.db");

    let patient_id = {
        let db = Database::open(&path)?;
        let patient = db.create_patient(PatientInput {
            name: "Max".into(),
            species: Some("canine".into()),
            ..Default::default()
        })?;
        patient.id
    };

    let db = Database::open(&path)?;
    assert!(db.patient(&patient_id)?.is_some());
    // Seeding topped the formulary up once; reopening leaves counts alone.
    assert_eq!(
        db.count_docs(schema::DRUGS)?,
        seed::data::initial_drugs().len()
    );
    assert_eq!(
        db.count_docs(schema::TEMPLATES)?,
        seed::data::initial_templates().len()
    );
    Ok(())
}

#[test]
fn legacy_documents_migrate_on_reopen() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("records.db");

    {
        let db = Database::open(&path)?;
        insert_raw(
            &db,
            schema::PATIENTS,
            1,
            json!({ "id": "pat_legacy", "name": "Maria", "practice": "human" }),
        )?;
        insert_raw(
            &db,
            schema::FINANCIAL,
            0,
            json!({
                "id": "fin_legacy",
                "type": "income",
                "amount": 120.0,
                "date": "2024-01-15T10:00:00Z"
            }),
        )?;
        insert_raw(
            &db,
            schema::OPHTHALMO,
            0,
            json!({
                "id": "oph_legacy",
                "patient_id": "pat_legacy",
                "date": "2023-03-10T09:00:00Z",
                "visual_acuity": "20/30",
                "iop": 17.5,
                "diagnosis": "uveíte anterior"
            }),
        )?;
        insert_raw(
            &db,
            schema::DRUGS,
            0,
            json!({ "id": "drug_legacy", "name": "Vermífugo Composto", "type": "vet" }),
        )?;
    }

    let db = Database::open(&path)?;

    let patient = db.patient("pat_legacy")?.expect("patient survives reopen");
    assert_eq!(patient.scope, clinrec_core::PracticeScope::Human);

    let transactions = db.transactions(&TransactionFilter::default())?;
    let legacy = transactions
        .iter()
        .find(|t| t.id == "fin_legacy")
        .expect("legacy transaction present");
    assert_eq!(legacy.status, TransactionStatus::Paid);
    assert_eq!(legacy.due_date.as_deref(), Some("2024-01-15T10:00:00Z"));
    assert_eq!(legacy.paid_at.as_deref(), Some("2024-01-15T10:00:00Z"));

    let exam = db.ophthalmo_exam("oph_legacy")?.expect("ophthalmo exam");
    assert_eq!(exam.right_eye.visual_acuity.as_deref(), Some("20/30"));
    assert_eq!(exam.right_eye.iop, Some(17.5));
    assert_eq!(exam.general_diagnosis.as_deref(), Some("uveíte anterior"));

    let drugs = db.search_drugs("vermífugo", None, 10)?;
    assert_eq!(drugs.len(), 1);
    assert_eq!(drugs[0].category.as_deref(), Some("Geral"));

    // Versions in the table were bumped to current.
    let stored_version: u32 = db.conn().query_row(
        "SELECT schema_version FROM documents WHERE collection = 'financial' AND id = 'fin_legacy'",
        [],
        |row| row.get(0),
    )?;
    assert_eq!(stored_version, 1);
    Ok(())
}

#[test]
fn timeline_merges_and_orders_across_sources() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let patient = db.create_patient(PatientInput {
        name: "Paciente Teste Timeline".into(),
        species: Some("dog".into()),
        owner_name: Some("Tutor Teste".into()),
        ..Default::default()
    })?;

    db.create_exam(ExamInput {
        patient_id: patient.id.clone(),
        date: Some("2025-01-03T12:00:00Z".into()),
        ..Default::default()
    })?;
    db.create_prescription(PrescriptionInput {
        patient_id: patient.id.clone(),
        date: Some("2025-01-03T11:00:00Z".into()),
        ..Default::default()
    })?;
    db.create_lab_exam(LabExamInput {
        patient_id: patient.id.clone(),
        exam_type: "hemogram".into(),
        date: Some("2025-01-03T10:00:00Z".into()),
        ..Default::default()
    })?;

    let timeline = db.patient_timeline(&patient.id)?;
    assert_eq!(timeline.len(), 3);
    let sources: Vec<_> = timeline.iter().map(|e| e.collection).collect();
    assert_eq!(
        sources,
        vec![
            TimelineSource::Exams,
            TimelineSource::Prescriptions,
            TimelineSource::LabExams
        ]
    );
    Ok(())
}

#[test]
fn cascade_delete_covers_exams_only() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let patient = db.create_patient(PatientInput {
        name: "Max".into(),
        ..Default::default()
    })?;

    for _ in 0..2 {
        db.create_exam(ExamInput {
            patient_id: patient.id.clone(),
            ..Default::default()
        })?;
    }
    db.create_lab_exam(LabExamInput {
        patient_id: patient.id.clone(),
        exam_type: "biochemistry".into(),
        ..Default::default()
    })?;

    db.delete_patient(&patient.id)?;

    assert!(db.patient(&patient.id)?.is_none());
    assert!(db.exams(Some(&patient.id))?.is_empty());
    assert_eq!(db.lab_exams(Some(&patient.id))?.len(), 1);
    Ok(())
}

#[test]
fn monthly_balance_and_status_transitions() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    let date = "2025-06-05T09:00:00Z";

    db.add_transaction(TransactionInput {
        kind: TransactionType::Income,
        amount: 100.0,
        date: Some(date.into()),
        ..Default::default()
    })?;
    db.add_transaction(TransactionInput {
        kind: TransactionType::Expense,
        amount: 40.0,
        date: Some(date.into()),
        ..Default::default()
    })?;
    let pending = db.add_transaction(TransactionInput {
        kind: TransactionType::Income,
        amount: 30.0,
        status: Some(TransactionStatus::Pending),
        date: Some(date.into()),
        ..Default::default()
    })?;

    let balance = db.balance(&BalanceFilter {
        month: Some(6),
        year: Some(2025),
    })?;
    assert_eq!(balance.total_income, 100.0);
    assert_eq!(balance.total_expense, 40.0);
    assert_eq!(balance.pending_forecast, 30.0);
    assert_eq!(balance.balance, 60.0);

    // Settling the pending income moves it out of the forecast.
    db.update_transaction(&pending.id, json!({ "status": "paid" }))?;
    let balance = db.balance(&BalanceFilter {
        month: Some(6),
        year: Some(2025),
    })?;
    assert_eq!(balance.pending_forecast, 0.0);
    assert_eq!(balance.total_income, 130.0);
    Ok(())
}

#[test]
fn scoped_patient_listings_stay_segregated() -> anyhow::Result<()> {
    let db = Database::open_in_memory()?;
    db.create_patient(PatientInput {
        name: "Rex".into(),
        ..Default::default()
    })?;
    db.create_patient(PatientInput {
        name: "João".into(),
        practice: Some("human".into()),
        ..Default::default()
    })?;

    let vets = db.patients(&PatientFilter {
        scope: Some(clinrec_core::PracticeScope::Vet),
    })?;
    let humans = db.patients(&PatientFilter {
        scope: Some(clinrec_core::PracticeScope::Human),
    })?;
    assert_eq!(vets.len(), 1);
    assert_eq!(vets[0].name, "Rex");
    assert_eq!(humans.len(), 1);
    assert_eq!(humans[0].name, "João");
    Ok(())
}

use healthcard_model::entities::{ALLERGY, FAMILY_HISTORY, IMPLANTS, SURGERY, VACCINATION, VITALS};
use healthcard_model::{
    Allergy, Attachment, FamilyHistoryRecord, FieldErrorKind, FieldValue, FormField, FormValues,
    Implant, ModuleSchema, Pattern, Record, RequestBody, Surgery, Vaccination,
};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};

fn json_body(schema: &ModuleSchema, form: &FormValues) -> Map<String, Value> {
    match schema.body_from_form(form) {
        RequestBody::Json(map) => map,
        other => panic!("expected a JSON body, got {other:?}"),
    }
}

// ── Blank forms ──────────────────────────────────────────────────

#[test]
fn blank_form_applies_defaults() {
    let form = FormValues::blank(&VACCINATION);
    assert_eq!(form.text("status"), "Completed");
    assert_eq!(form.text("vaccine_name"), "");

    let form = FormValues::blank(&ALLERGY);
    assert_eq!(form.flag("active"), Some(true));

    let form = FormValues::blank(&IMPLANTS);
    assert_eq!(form.text("status"), "Active");

    let form = FormValues::blank(&FAMILY_HISTORY);
    assert_eq!(form.get("medical_conditions"), Some(&FieldValue::List(vec![])));
}

#[test]
fn blank_form_covers_every_field() {
    for schema in [&ALLERGY, &SURGERY, &IMPLANTS, &VACCINATION, &FAMILY_HISTORY] {
        let form = FormValues::blank(schema);
        for field in schema.fields {
            assert!(form.get(field.name).is_some(), "{}.{}", schema.name, field.name);
        }
    }
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn blank_allergy_reports_every_required_field() {
    let errors = FormValues::blank(&ALLERGY)
        .validate(&ALLERGY)
        .expect_err("blank form is invalid");
    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(fields, vec!["allergen", "severity"]);
    assert!(errors.iter().all(|e| e.kind == FieldErrorKind::Missing));
}

#[test]
fn choice_fields_match_case_insensitively() {
    let form = FormValues::blank(&ALLERGY)
        .with("allergen", "Peanuts")
        .with("severity", "severe");
    assert!(form.validate(&ALLERGY).is_ok());

    let form = form.with("severity", "catastrophic");
    let errors = form.validate(&ALLERGY).expect_err("unknown severity");
    assert_eq!(
        errors[0].kind,
        FieldErrorKind::NotAnOption("catastrophic".to_string())
    );
}

#[test]
fn digit_pattern_requires_exact_length() {
    static FIELDS: [FormField; 1] = [FormField::text("uid", "UID").required().digits(16)];
    let schema = ModuleSchema {
        fields: &FIELDS,
        ..ALLERGY
    };
    assert!(Pattern::Digits(16).matches("1234567890123456"));
    assert!(!Pattern::Digits(16).matches("123456789012345"));
    assert!(!Pattern::Digits(6).matches("12a456"));

    let form = FormValues::new().with("uid", "12345");
    let errors = form.validate(&schema).expect_err("short uid");
    assert_eq!(errors[0].to_string(), "uid must be exactly 16 digits");
}

#[test]
fn attachments_are_limited() {
    let mut form = FormValues::blank(&FAMILY_HISTORY)
        .with("relation", "Father")
        .with("living_status", "Alive");
    for i in 0..4 {
        form.attach(Attachment::new(format!("scan{i}.png"), vec![0; 10]));
    }
    form.attach(Attachment::new("notes.exe", vec![0; 10]));
    form.attach(Attachment::new("big.pdf", vec![0; 5 * 1024 * 1024 + 1]));

    let errors = form.validate(&FAMILY_HISTORY).expect_err("too many files");
    let kinds: Vec<&FieldErrorKind> = errors.iter().map(|e| &e.kind).collect();
    assert!(kinds.contains(&&FieldErrorKind::TooManyFiles(3)));
    assert!(kinds.contains(&&FieldErrorKind::FileType("notes.exe".to_string())));
    assert!(kinds.contains(&&FieldErrorKind::FileTooLarge("big.pdf".to_string())));
}

#[test]
fn json_modules_reject_attachments() {
    let mut form = FormValues::blank(&SURGERY)
        .with("surgery_name", "LASIK")
        .with("surgery_date", "2024-01-01");
    form.attach(Attachment::new("x.pdf", vec![1]));
    let errors = form.validate(&SURGERY).expect_err("no attachments on surgery");
    assert_eq!(errors[0].kind, FieldErrorKind::AttachmentsNotAccepted);
}

#[test]
fn vitals_need_any_measurement() {
    let form = FormValues::blank(&VITALS).with("notes", "felt dizzy");
    let errors = form.validate(&VITALS).expect_err("no measurement");
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        FieldErrorKind::NoneFilled("Please fill at least one vital measurement.")
    );

    let form = FormValues::blank(&VITALS).with("spo2", "98");
    assert!(form.validate(&VITALS).is_ok());
}

// ── Request bodies ───────────────────────────────────────────────

#[test]
fn unmodified_allergy_edit_reproduces_record() {
    let allergy: Allergy = serde_json::from_value(json!({
        "id": 7,
        "allergen": "Peanuts",
        "severity": "severe",
        "reaction": "Hives",
        "diagnosedDate": "2020-04-02",
        "category": "Food",
        "active": false,
        "notes": "Carries epipen"
    }))
    .expect("decode");
    let body = json_body(&ALLERGY, &allergy.to_form());
    assert_eq!(
        Value::Object(body),
        json!({
            "allergen": "Peanuts",
            "severity": "severe",
            "reaction": "Hives",
            "diagnosed_date": "2020-04-02",
            "category": "Food",
            "active": false,
            "notes": "Carries epipen"
        })
    );
}

#[test]
fn unmodified_surgery_edit_reproduces_camel_record() {
    let surgery: Surgery = serde_json::from_value(json!({
        "id": 3,
        "surgeryName": "Hernia Repair",
        "surgeryDate": "2022-09-09",
        "surgeon": "Dr. Iyer",
        "outcome": "Successful",
        "notes": "Day case"
    }))
    .expect("decode");
    let body = json_body(&SURGERY, &surgery.to_form());
    assert_eq!(body["surgery_name"], "Hernia Repair");
    assert_eq!(body["surgery_date"], "2022-09-09");
    assert_eq!(body["surgeon"], "Dr. Iyer");
    assert_eq!(body["notes"], "Day case");
    assert_eq!(body["hospital"], "");
}

#[test]
fn vaccination_optional_fields_become_null() {
    let v: Vaccination = serde_json::from_value(json!({
        "id": 1,
        "vaccineName": "MMR",
        "vaccinationDate": "2024-03-03",
        "category": "Child",
        "doseNumber": "1"
    }))
    .expect("decode");
    let body = json_body(&VACCINATION, &v.to_form());
    assert_eq!(body["vaccine_name"], "MMR");
    assert_eq!(body["next_due_date"], Value::Null);
    assert_eq!(body["manufacturer"], Value::Null);
    assert_eq!(body["notes"], Value::Null);
    assert_eq!(body["status"], "Completed");
}

#[test]
fn family_history_builds_multipart() {
    let mut form = FormValues::blank(&FAMILY_HISTORY)
        .with("relation", "Grandfather")
        .with("living_status", "Deceased")
        .with("medical_conditions", vec!["Diabetes".to_string(), "Stroke".to_string()]);
    form.attach(Attachment::new("report.PDF", vec![1, 2, 3]));

    let body = FAMILY_HISTORY.body_from_form(&form);
    let multipart = body.as_multipart().expect("multipart body");
    assert_eq!(multipart.value("relation"), Some("Grandfather"));
    assert_eq!(multipart.values("medical_conditions"), vec!["Diabetes", "Stroke"]);
    assert!(multipart.values("remove_documents").is_empty());
    assert_eq!(multipart.files.len(), 1);
    assert_eq!(multipart.files[0].0, "documents");
    assert_eq!(multipart.files[0].1.content_type, "application/pdf");
}

#[test]
fn unmodified_implant_edit_maps_expiry_variants() {
    for key in ["warrantyExpiry", "expiryDate"] {
        let implant: Implant = serde_json::from_value(json!({
            "id": 4,
            "deviceName": "Pacemaker",
            "implantationDate": "2019-06-01",
            "manufacturer": "Medtronic",
            "serialNumber": "SN-88",
            "status": "Recall",
            key: "2029-06-01",
            "surgeonName": "Dr. Khan"
        }))
        .expect("decode");
        let body = json_body(&IMPLANTS, &implant.to_form());
        assert_eq!(
            Value::Object(body),
            json!({
                "device_name": "Pacemaker",
                "implantation_date": "2019-06-01",
                "manufacturer": "Medtronic",
                "model_number": "",
                "serial_number": "SN-88",
                "category": "",
                "status": "Recall",
                "expiry_date": "2029-06-01",
                "surgeon_name": "Dr. Khan",
                "hospital_name": "",
                "notes": ""
            }),
            "{key}"
        );
    }
}

#[test]
fn unmodified_vaccination_edit_reproduces_record() {
    let v: Vaccination = serde_json::from_value(json!({
        "id": 9,
        "vaccineName": "Hepatitis B",
        "vaccinationDate": "2023-01-10",
        "category": "Adult",
        "doseNumber": "2",
        "nextDueDate": "2023-07-10",
        "status": "Upcoming",
        "manufacturer": "GSK",
        "batchLotNumber": "L-204",
        "hospitalClinicName": "City Clinic",
        "doctorNurseName": "Nurse Ada",
        "sideEffects": "",
        "notes": "Second of three"
    }))
    .expect("decode");
    let body = json_body(&VACCINATION, &v.to_form());
    assert_eq!(
        Value::Object(body),
        json!({
            "vaccine_name": "Hepatitis B",
            "vaccination_date": "2023-01-10",
            "category": "Adult",
            "dose_number": "2",
            "next_due_date": "2023-07-10",
            "status": "Upcoming",
            "manufacturer": "GSK",
            "batch_lot_number": "L-204",
            "hospital_clinic_name": "City Clinic",
            "doctor_nurse_name": "Nurse Ada",
            "side_effects": null,
            "notes": "Second of three"
        })
    );
}

#[test]
fn unmodified_family_history_edit_sends_first_condition_notes() {
    let record: FamilyHistoryRecord = serde_json::from_value(json!({
        "id": 6,
        "relation": "Father",
        "livingStatus": "Deceased",
        "age": 71,
        "gender": "Male",
        "medicalConditions": ["Hypertension", "Stroke"],
        "conditionDetails": [{"notes": "late onset"}, {"notes": "second"}]
    }))
    .expect("decode");
    let body = FAMILY_HISTORY.body_from_form(&record.to_form());
    let multipart = body.as_multipart().expect("multipart body");
    assert_eq!(multipart.value("relation"), Some("Father"));
    assert_eq!(multipart.value("living_status"), Some("Deceased"));
    assert_eq!(multipart.value("age"), Some("71"));
    assert_eq!(multipart.value("gender"), Some("Male"));
    assert_eq!(multipart.value("notes"), Some("late onset"));
    assert_eq!(
        multipart.values("medical_conditions"),
        vec!["Hypertension", "Stroke"]
    );
    assert!(multipart.values("remove_documents").is_empty());
    assert!(multipart.files.is_empty());
}

//! Subcommand execution.

use crate::args::{
    BloodBankCommand, Command, DoctorCommand, FormArgs, HospitalCommand, InsuranceCommand,
    ListFilter, Module, PharmacyCommand,
};
use crate::render;
use anyhow::{Context, Result, anyhow, bail};
use healthcard_model::filter::{AssessmentCategory, HistoryQuery, ListQuery, VitalsQuery};
use healthcard_model::{
    Allergy, Attachment, FamilyHistoryRecord, FieldKind, FieldValue, FormField, HealthAssessment,
    Implant, ListView, Medicine, Record, Surgery, Vaccination, VitalRecord, markup,
};
use healthcard_sync::dashboard::{
    Appointment, BloodBankDashboard, ClaimFilter, ClaimReview, Consultation, Department,
    DoctorDashboard, HospitalDashboard, InsuranceDashboard, Investigation, MedicalRecords,
    NewBloodUnit, NewDepartment, NewDoctor, NewInvestigation, NewMedicalHistory, NewPatientVitals,
    Outcome, PatientVital, PharmacyDashboard, PharmacyRequest, Urgency, record_type_label,
};
use healthcard_sync::{
    DeleteOutcome, LoadOutcome, ModalMode, Prompt, RecordSynchronizer, RecordTransport, SaveOutcome,
};
use healthcard_types::RecordId;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// The transport and prompt every command runs against.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn RecordTransport>,
    prompt: Arc<dyn Prompt>,
}

impl Session {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self { transport, prompt }
    }

    fn records<R: Record>(&self) -> RecordSynchronizer<R> {
        RecordSynchronizer::new(self.transport.clone(), self.prompt.clone())
    }
}

/// Calls a generic async fn with the record type of `module`.
macro_rules! dispatch {
    ($module:expr, $func:ident ( $($arg:expr),* )) => {
        match $module {
            Module::Vaccination => $func::<Vaccination>($($arg),*).await,
            Module::Surgery => $func::<Surgery>($($arg),*).await,
            Module::Implants => $func::<Implant>($($arg),*).await,
            Module::Allergy => $func::<Allergy>($($arg),*).await,
            Module::FamilyHistory => $func::<FamilyHistoryRecord>($($arg),*).await,
            Module::Assessments => $func::<HealthAssessment>($($arg),*).await,
            Module::Vitals => $func::<VitalRecord>($($arg),*).await,
            Module::Pharmacy => $func::<Medicine>($($arg),*).await,
        }
    };
}

/// Runs `command`, writing its output to `out`.
pub async fn execute<W: Write>(session: &Session, command: Command, out: &mut W) -> Result<()> {
    let text = match command {
        Command::List {
            module,
            html,
            filter,
        } => {
            let view = list(session, module, &filter).await?;
            if html {
                markup::list_html(&view)
            } else {
                render::list_text(&view)
            }
        }
        Command::Show { module, id } => dispatch!(module, show(session, id))?,
        Command::Stats { module } => dispatch!(module, stats(session))?,
        Command::Add { module, form } => dispatch!(module, add(session, &form))?,
        Command::Edit { module, id, form } => dispatch!(module, edit(session, id, &form))?,
        Command::Delete { module, id } => dispatch!(module, delete(session, id))?,
        Command::Suggest { module, category } => {
            dispatch!(module, suggest(category.as_deref()))?
        }
        Command::Doctor(command) => doctor(session, command).await?,
        Command::Hospital(command) => hospital(session, command).await?,
        Command::Insurance(command) => insurance(session, command).await?,
        Command::Pharmacy(command) => pharmacy(session, command).await?,
        Command::BloodBank(command) => blood_bank(session, command).await?,
    };
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

// ── Record modules ───────────────────────────────────────────────

async fn list(session: &Session, module: Module, filter: &ListFilter) -> Result<ListView> {
    match module {
        Module::FamilyHistory => {
            let query = HistoryQuery {
                q: filter.search.clone().unwrap_or_default(),
                relation: filter.relation.clone().unwrap_or_default(),
                condition: filter.condition.clone().unwrap_or_default(),
            };
            let sync = session.records::<FamilyHistoryRecord>();
            load(&sync, &query).await?;
            Ok(sync.render().await)
        }
        Module::Assessments => {
            let sync = session.records::<HealthAssessment>();
            load(&sync, &()).await?;
            let category = AssessmentCategory::parse(filter.category.as_deref().unwrap_or_default());
            Ok(sync.render_category(&category).await)
        }
        Module::Vitals => {
            let query = filter
                .days
                .map(|days| VitalsQuery { days })
                .unwrap_or_default();
            let sync = session.records::<VitalRecord>();
            load(&sync, &query).await?;
            Ok(sync.render().await)
        }
        _ => dispatch!(module, list_all(session)),
    }
}

async fn list_all<R: Record>(session: &Session) -> Result<ListView> {
    let sync = session.records::<R>();
    load(&sync, &()).await?;
    Ok(sync.render().await)
}

async fn load<R: Record>(
    sync: &RecordSynchronizer<R>,
    query: &(dyn ListQuery + Sync),
) -> Result<()> {
    let noun = R::schema().noun;
    let outcome = sync
        .load_with(query)
        .await
        .with_context(|| format!("failed to load {noun} records"))?;
    match outcome {
        LoadOutcome::Applied { count, .. } => {
            debug!("loaded {count} {noun} records");
            Ok(())
        }
        LoadOutcome::Rejected { message } => bail!("server refused to list {noun} records: {message}"),
        LoadOutcome::Discarded { .. } => bail!("{noun} load was superseded"),
    }
}

async fn show<R: Record>(session: &Session, id: RecordId) -> Result<String> {
    let sync = session.records::<R>();
    load(&sync, &()).await?;
    let modal = sync
        .open_view(id)
        .await
        .with_context(|| format!("no {} with id {id}", R::schema().noun))?;
    Ok(render::form_text(&modal.title, R::schema(), &modal.form))
}

async fn stats<R: Record>(session: &Session) -> Result<String> {
    let sync = session.records::<R>();
    load(&sync, &()).await?;
    Ok(render::stats_text(&sync.stat_tiles().await))
}

async fn add<R: Record>(session: &Session, form: &FormArgs) -> Result<String> {
    let sync = session.records::<R>();
    sync.open_modal(None).await?;
    fill(&sync, form).await?;
    submit(&sync).await
}

async fn edit<R: Record>(session: &Session, id: RecordId, form: &FormArgs) -> Result<String> {
    let sync = session.records::<R>();
    load(&sync, &()).await?;
    let modal = sync.open_modal(Some(id)).await?;
    if matches!(modal.mode, ModalMode::Add) {
        sync.close_modal().await;
        bail!("no {} with id {id}", R::schema().noun);
    }
    fill(&sync, form).await?;
    submit(&sync).await
}

async fn fill<R: Record>(sync: &RecordSynchronizer<R>, form: &FormArgs) -> Result<()> {
    let schema = R::schema();
    for (name, raw) in &form.fields {
        let field = schema
            .field(name)
            .ok_or_else(|| anyhow!("{} has no field `{name}`", schema.noun))?;
        sync.set_field(name, field_value(field, raw)?).await?;
    }
    for path in &form.attachments {
        sync.attach(read_attachment(path)?).await?;
    }
    Ok(())
}

async fn submit<R: Record>(sync: &RecordSynchronizer<R>) -> Result<String> {
    let noun = R::schema().noun;
    match sync.save().await.with_context(|| format!("failed to save {noun}"))? {
        SaveOutcome::Saved { id: Some(id) } => Ok(format!("Saved {noun} #{id}\n")),
        SaveOutcome::Saved { id: None } => Ok(format!("Saved new {noun}\n")),
        SaveOutcome::Rejected { message } => bail!("server refused to save {noun}: {message}"),
        SaveOutcome::Invalid(errors) => {
            let reasons: Vec<String> = errors.iter().map(ToString::to_string).collect();
            bail!("invalid {noun}: {}", reasons.join("; "))
        }
    }
}

async fn delete<R: Record>(session: &Session, id: RecordId) -> Result<String> {
    let noun = R::schema().noun;
    let outcome = session
        .records::<R>()
        .delete(id)
        .await
        .with_context(|| format!("failed to delete {noun} {id}"))?;
    match outcome {
        DeleteOutcome::Deleted(id) => Ok(format!("Deleted {noun} #{id}\n")),
        DeleteOutcome::Cancelled => Ok("Cancelled.\n".to_string()),
        DeleteOutcome::Rejected { message } => bail!("server refused to delete {noun} {id}: {message}"),
    }
}

async fn suggest<R: Record>(category: Option<&str>) -> Result<String> {
    let schema = R::schema();
    let catalog = schema
        .suggestions
        .ok_or_else(|| anyhow!("{} has no name suggestions", schema.noun))?;
    let items: Vec<&str> = match category {
        Some(category) => catalog.lookup(category).to_vec(),
        None => catalog.categories().collect(),
    };
    Ok(items.iter().map(|item| format!("{item}\n")).collect())
}

/// Converts a command-line value to the shape `field` holds.
///
/// Flags accept yes/no, true/false, on/off and 1/0. Lists are comma
/// separated.
pub fn field_value(field: &FormField, raw: &str) -> Result<FieldValue> {
    Ok(match field.kind {
        FieldKind::Flag => {
            let flag = match raw.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" | "on" | "1" => true,
                "no" | "n" | "false" | "off" | "0" => false,
                _ => bail!("`{}` expects yes or no, got `{raw}`", field.name),
            };
            FieldValue::Flag(flag)
        }
        FieldKind::Multi(_) => FieldValue::List(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(String::from)
                .collect(),
        ),
        _ => FieldValue::Text(raw.to_string()),
    })
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} is not a file", path.display()))?;
    Ok(Attachment::new(file_name, bytes))
}

// ── Dashboards ───────────────────────────────────────────────────

fn dash(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or("-")
}

fn appointment_line(a: &Appointment) -> String {
    format!(
        "{} {}  {}  {}  [{}]\n",
        dash(&a.date),
        dash(&a.time),
        dash(&a.patient),
        dash(&a.kind),
        dash(&a.status)
    )
}

fn medical_records_text(records: &MedicalRecords) -> String {
    let mut out = format!(
        "Allergies: {} | Surgeries: {} | Vaccinations: {} | Implants: {} | Family history: {}\n",
        records.allergies_count,
        records.surgeries_count,
        records.vaccinations_count,
        records.implants_count,
        records.family_history_count
    );
    if records.medical_history.is_empty() {
        out.push_str("No medical history recorded.\n");
    }
    for entry in &records.medical_history {
        let status = if entry.is_active { "active" } else { "resolved" };
        out.push_str(&format!(
            "#{:<5}{}  {}  [{}]  {status}\n",
            entry.id.to_string(),
            dash(&entry.condition_name),
            record_type_label(dash(&entry.record_type)),
            dash(&entry.severity)
        ));
    }
    out
}

async fn doctor(session: &Session, command: DoctorCommand) -> Result<String> {
    let dashboard = DoctorDashboard::new(session.transport.clone(), session.prompt.clone());
    let mut out = String::new();
    match command {
        DoctorCommand::Overview => {
            let (stats, today) = dashboard
                .overview()
                .await
                .context("failed to load the doctor dashboard")?;
            out.push_str(&format!(
                "Today: {} | Pending: {} | Completed: {} | Lab reports: {}\n",
                stats.today_appointments, stats.pending_patients, stats.completed, stats.lab_reports
            ));
            match &today.next_patient {
                Some(next) => out.push_str(&format!("Next patient: {}", appointment_line(next))),
                None => out.push_str("No patients waiting\n"),
            }
            for appointment in &today.appointments {
                out.push_str(&appointment_line(appointment));
            }
        }
        DoctorCommand::Appointments { filter } => {
            for appointment in dashboard.appointments(&filter).await? {
                out.push_str(&appointment_line(&appointment));
            }
        }
        DoctorCommand::Search { query } => {
            for patient in dashboard.search_patients(&query).await? {
                out.push_str(&format!(
                    "{}  {}  {}  {}\n",
                    dash(&patient.uid),
                    dash(&patient.full_name),
                    dash(&patient.email),
                    dash(&patient.phone)
                ));
            }
        }
        DoctorCommand::Summary { uid } => {
            let summary = dashboard.patient_summary(&uid).await?;
            out.push_str(&serde_json::to_string_pretty(&summary)?);
            out.push('\n');
        }
        DoctorCommand::RequestAccess { uid } => {
            let countdown = dashboard.request_access(&uid).await?;
            out.push_str(&format!(
                "OTP sent to patient {uid}. It expires in {}.\n",
                countdown.label()
            ));
        }
        DoctorCommand::VerifyAccess { uid, otp } => {
            let url = dashboard.verify_access(&uid, &otp).await?;
            out.push_str(&format!("Access granted: {url}\n"));
        }
        DoctorCommand::Consult {
            uid,
            subjective,
            objective,
            assessment,
            plan,
            prescriptions,
            lab_orders,
        } => {
            let consultation = Consultation {
                patient_uid: uid.clone(),
                subjective,
                objective,
                assessment,
                plan,
                prescriptions,
                lab_orders,
            };
            match dashboard.save_consultation(&consultation).await? {
                Outcome::Rejected { message } => {
                    bail!("server refused the consultation for {uid}: {message}")
                }
                _ => out.push_str(&format!("Consultation saved for patient {uid}\n")),
            }
        }
        DoctorCommand::History { uid } => {
            let records = dashboard
                .medical_records(&uid)
                .await
                .with_context(|| format!("failed to load medical records of {uid}"))?;
            out.push_str(&medical_records_text(&records));
        }
        DoctorCommand::AddHistory {
            uid,
            record_type,
            condition,
            diagnosed,
            severity,
            inactive,
            treatment,
            notes,
        } => {
            let entry = NewMedicalHistory {
                record_type,
                condition_name: condition,
                diagnosis_date: diagnosed,
                severity,
                is_active: !inactive,
                treatment,
                notes,
            };
            match dashboard.add_medical_history(&uid, &entry).await? {
                Outcome::Done(records) => out.push_str(&medical_records_text(&records)),
                Outcome::Cancelled => out.push_str("Cancelled.\n"),
                Outcome::Rejected { message } => bail!("server refused: {message}"),
            }
        }
        DoctorCommand::DeleteHistory { uid, id } => {
            match dashboard.delete_medical_history(&uid, id).await? {
                Outcome::Done(records) => {
                    out.push_str(&format!("Deleted record #{id}\n"));
                    out.push_str(&medical_records_text(&records));
                }
                Outcome::Cancelled => out.push_str("Cancelled.\n"),
                Outcome::Rejected { message } => bail!("server refused to delete record {id}: {message}"),
            }
        }
        DoctorCommand::Vitals { uid } => {
            let vitals = dashboard
                .patient_vitals(&uid)
                .await
                .with_context(|| format!("failed to load vitals of {uid}"))?;
            out.push_str(&patient_vitals_text(&vitals));
        }
        DoctorCommand::RecordVitals {
            uid,
            bp,
            heart_rate,
            respiratory_rate,
            spo2,
            temperature,
            pain_score,
            blood_sugar,
            weight,
            height,
            visit_type,
            notes,
        } => {
            let (systolic_bp, diastolic_bp) = bp.unwrap_or_default();
            let vitals = NewPatientVitals {
                systolic_bp,
                diastolic_bp,
                heart_rate,
                respiratory_rate,
                spo2,
                temperature,
                pain_score,
                blood_sugar,
                weight,
                height,
                visit_type,
                notes,
            };
            match dashboard.record_vitals(&uid, &vitals).await? {
                Outcome::Done(list) => out.push_str(&patient_vitals_text(&list)),
                Outcome::Rejected { message } => {
                    bail!("server refused the vitals for {uid}: {message}")
                }
                Outcome::Cancelled => out.push_str("Cancelled.\n"),
            }
        }
        DoctorCommand::Investigations { uid } => {
            let investigations = dashboard
                .investigations(&uid)
                .await
                .with_context(|| format!("failed to load investigations of {uid}"))?;
            out.push_str(&investigations_text(&investigations));
        }
        DoctorCommand::Order {
            uid,
            investigation_type,
            test,
            category,
            urgent,
            clinical_indication,
            notes,
        } => {
            let order = NewInvestigation {
                investigation_type: investigation_type.as_str().to_string(),
                category,
                test_name: test,
                urgency: if urgent { Urgency::Urgent } else { Urgency::Routine },
                clinical_indication,
                notes,
            };
            match dashboard.order_investigation(&uid, &order).await? {
                Outcome::Done(list) => out.push_str(&investigations_text(&list)),
                Outcome::Rejected { message } => {
                    bail!("server refused the investigation for {uid}: {message}")
                }
                Outcome::Cancelled => out.push_str("Cancelled.\n"),
            }
        }
    }
    Ok(out)
}

fn patient_vitals_text(vitals: &[PatientVital]) -> String {
    if vitals.is_empty() {
        return "No vitals recorded yet\n".to_string();
    }
    vitals
        .iter()
        .map(|v| {
            format!(
                "{}  BP {}  HR {}  SpO2 {}  Temp {}  by {}\n",
                dash(&v.recorded_at),
                v.blood_pressure().as_deref().unwrap_or("-"),
                dash(&v.heart_rate),
                dash(&v.spo2),
                dash(&v.temperature),
                v.recorded_by().unwrap_or("-")
            )
        })
        .collect()
}

fn investigations_text(investigations: &[Investigation]) -> String {
    if investigations.is_empty() {
        return "No investigations ordered yet\n".to_string();
    }
    investigations
        .iter()
        .map(|inv| {
            format!(
                "#{:<5}{}  {}  [{}]  {}\n",
                inv.id.to_string(),
                dash(&inv.test_name),
                dash(&inv.investigation_type),
                dash(&inv.status),
                inv.result_summary().as_deref().unwrap_or("-")
            )
        })
        .collect()
}

fn departments_text(departments: &[Department]) -> String {
    departments
        .iter()
        .map(|d| {
            format!(
                "#{:<5}{}  head: {}\n",
                d.id.to_string(),
                dash(&d.name),
                dash(&d.head)
            )
        })
        .collect()
}

async fn hospital(session: &Session, command: HospitalCommand) -> Result<String> {
    let dashboard = HospitalDashboard::new(session.transport.clone(), session.prompt.clone());
    let mut out = String::new();
    let doctors_text = |doctors: &[healthcard_sync::dashboard::Doctor]| -> String {
        doctors
            .iter()
            .map(|d| {
                format!(
                    "{}  {}  {}  [{}]\n",
                    dash(&d.uid),
                    dash(&d.name),
                    dash(&d.specialty),
                    dash(&d.status)
                )
            })
            .collect()
    };
    match command {
        HospitalCommand::Overview => {
            let (stats, doctors, departments) = tokio::try_join!(
                dashboard.stats(),
                dashboard.doctors(),
                dashboard.departments()
            )
            .context("failed to load the hospital dashboard")?;
            out.push_str(&format!(
                "Doctors: {} | Patients: {} | Appointments: {} | Revenue: {}\n",
                stats.doctors,
                stats.patients,
                stats.appointments,
                dash(&stats.revenue)
            ));
            out.push_str("\nDoctors\n");
            out.push_str(&doctors_text(&doctors));
            out.push_str("\nDepartments\n");
            out.push_str(&departments_text(&departments));
        }
        HospitalCommand::AddDoctor {
            uid,
            name,
            specialty,
            email,
            phone,
        } => {
            let doctor = NewDoctor {
                uid,
                name,
                specialty,
                email,
                phone,
            };
            let doctors = dashboard.add_doctor(&doctor).await?;
            out.push_str(&format!("Added doctor {}\n", doctor.uid));
            out.push_str(&doctors_text(&doctors));
        }
        HospitalCommand::AddDepartment { name, head } => {
            let departments = dashboard
                .add_department(&NewDepartment { name: name.clone(), head })
                .await?;
            out.push_str(&format!(
                "Added department {name} ({} total)\n",
                departments.len()
            ));
        }
        HospitalCommand::DeleteDepartment { id } => match dashboard.delete_department(id).await? {
            Outcome::Done(departments) => {
                out.push_str(&format!("Deleted department #{id}\n"));
                out.push_str(&departments_text(&departments));
            }
            Outcome::Cancelled => out.push_str("Cancelled.\n"),
            Outcome::Rejected { message } => bail!("server refused to delete department {id}: {message}"),
        },
        HospitalCommand::Analytics => {
            let analytics = dashboard
                .analytics()
                .await
                .context("failed to load hospital analytics")?;
            out.push_str(&format!("Revenue growth: {}\n", dash(&analytics.revenue_growth)));
            out.push_str("\nDepartment performance\n");
            for department in &analytics.department_performance {
                out.push_str(&format!(
                    "{:<24}{:>5.1}%\n",
                    dash(&department.name),
                    department.score
                ));
            }
            out.push_str("\nRecent activity\n");
            for entry in &analytics.recent_activity {
                out.push_str(&format!(
                    "{}  {}  {}\n",
                    dash(&entry.time),
                    dash(&entry.action),
                    dash(&entry.details)
                ));
            }
        }
    }
    Ok(out)
}

async fn insurance(session: &Session, command: InsuranceCommand) -> Result<String> {
    let dashboard = InsuranceDashboard::new(session.transport.clone(), session.prompt.clone());
    let mut out = String::new();
    match command {
        InsuranceCommand::Overview => {
            let stats = dashboard
                .stats()
                .await
                .context("failed to load the insurance dashboard")?;
            out.push_str(&format!(
                "Policies: {} | Active policyholders: {} | Claims today: {} | This month: {}\n",
                stats.total_policies,
                stats.active_policyholders,
                stats.claims_today,
                stats.claims_month
            ));
            out.push_str(&format!(
                "Approved: {} | Rejected: {} | Under review: {} | Cashless pending: {} | Fraud flags: {}\n",
                stats.claims_approved,
                stats.claims_rejected,
                stats.claims_under_review,
                stats.cashless_pending,
                stats.fraud_flags
            ));
            for alert in &stats.alerts {
                out.push_str(&format!("[{}] {}\n", dash(&alert.kind), dash(&alert.message)));
            }
        }
        InsuranceCommand::Policyholders { status, search } => {
            for holder in dashboard.policyholders(&status, &search).await? {
                let consent = if holder.has_active_consent() {
                    "consent"
                } else {
                    "no consent"
                };
                out.push_str(&format!(
                    "{}  {}  {}  [{}]  {consent}\n",
                    dash(&holder.policy_number),
                    dash(&holder.client_name),
                    dash(&holder.policy_type),
                    dash(&holder.policy_status)
                ));
            }
        }
        InsuranceCommand::Claims { status, from, to } => {
            let filter = ClaimFilter {
                status,
                date_from: from,
                date_to: to,
            };
            for claim in dashboard.claims(&filter).await? {
                out.push_str(&format!(
                    "{}  {}  {}  [{}]  SLA: {}\n",
                    dash(&claim.claim_id),
                    dash(&claim.client_name),
                    dash(&claim.hospital_name),
                    dash(&claim.status),
                    claim.sla().label()
                ));
            }
        }
        InsuranceCommand::Claim { id } => {
            let claim = dashboard.claim(&id).await?;
            out.push_str(&serde_json::to_string_pretty(&claim)?);
            out.push('\n');
        }
        InsuranceCommand::Review {
            id,
            decision,
            amount,
            remarks,
        } => {
            let review = ClaimReview {
                decision,
                approved_amount: amount,
                remarks,
            };
            dashboard.review_claim(&id, &review).await?;
            out.push_str(&format!("Review submitted for claim {id}\n"));
        }
    }
    Ok(out)
}

fn requests_text(requests: &[PharmacyRequest]) -> String {
    let mut out = format!(
        "{} requests, {} pending\n",
        requests.len(),
        PharmacyRequest::pending_count(requests)
    );
    for request in requests {
        let detail = match request.prescription_link() {
            Some(link) => link,
            None => dash(&request.medicine_details).to_string(),
        };
        out.push_str(&format!(
            "#{:<5}{}  {}  {}  {detail}  [{}]\n",
            request.id.to_string(),
            dash(&request.date),
            dash(&request.patient_name),
            dash(&request.patient_uid),
            dash(&request.status)
        ));
    }
    out
}

async fn pharmacy(session: &Session, command: PharmacyCommand) -> Result<String> {
    let dashboard = PharmacyDashboard::new(session.transport.clone(), session.prompt.clone());
    match command {
        PharmacyCommand::Requests => {
            let requests = dashboard
                .requests()
                .await
                .context("failed to load pharmacy requests")?;
            Ok(requests_text(&requests))
        }
        PharmacyCommand::Update {
            id,
            status,
            remarks,
        } => {
            let requests = dashboard.requests().await?;
            let request = requests
                .iter()
                .find(|r| r.id == id)
                .ok_or_else(|| anyhow!("no pharmacy request with id {id}"))?;
            match dashboard
                .update_request(request, status, remarks.as_deref())
                .await?
            {
                Outcome::Done(requests) => Ok(format!(
                    "Request #{id} marked {status}\n{}",
                    requests_text(&requests)
                )),
                Outcome::Cancelled => bail!("rejecting request {id} needs --remarks with a reason"),
                Outcome::Rejected { message } => bail!("server refused to update request {id}: {message}"),
            }
        }
    }
}

async fn blood_bank(session: &Session, command: BloodBankCommand) -> Result<String> {
    let dashboard = BloodBankDashboard::new(session.transport.clone(), session.prompt.clone());
    let outcome = match command {
        BloodBankCommand::AddUnit {
            blood_group,
            component,
            quantity,
            expiry_date,
        } => {
            let unit = NewBloodUnit {
                blood_group,
                component,
                quantity,
                expiry_date,
            };
            dashboard
                .add_unit(&unit)
                .await?
                .map_done(|_| format!("Added {} units of {}\n", unit.quantity, unit.blood_group))
        }
        BloodBankCommand::Process { id, action } => dashboard
            .process_request(id, action)
            .await?
            .map_done(|_| format!("Request #{id}: {action} done\n")),
    };
    match outcome {
        Outcome::Done(text) => Ok(text),
        Outcome::Cancelled => Ok("Cancelled.\n".to_string()),
        Outcome::Rejected { message } => bail!("blood bank refused: {message}"),
    }
}

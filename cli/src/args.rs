//! Command-line arguments.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use healthcard_sync::dashboard::{
    BloodRequestAction, InvestigationType, LabOrder, PrescriptionLine, RequestStatus, Urgency,
};
use healthcard_sync::{ClientConfig, DEFAULT_BASE_URL};
use healthcard_types::RecordId;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "healthcard")]
#[command(about = "Health card records and dashboards from the command line", version)]
pub struct Args {
    /// Server base URL
    #[arg(long, env = "HEALTHCARD_BASE_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub base_url: String,

    /// Value of the `session` cookie of a logged-in user
    #[arg(long, env = "HEALTHCARD_SESSION", hide_env_values = true, global = true)]
    pub session: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "HEALTHCARD_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout: u64,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Enable verbose debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            session_cookie: self.session.clone().filter(|s| !s.is_empty()),
            timeout_secs: self.timeout,
            ..ClientConfig::default().with_base_url(self.base_url.clone())
        }
    }
}

/// A record module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Module {
    Vaccination,
    Surgery,
    Implants,
    Allergy,
    FamilyHistory,
    Assessments,
    Vitals,
    /// Pharmacy medicine inventory
    Pharmacy,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List a module's records
    List {
        module: Module,
        /// Print the list as HTML instead of text
        #[arg(long)]
        html: bool,
        #[command(flatten)]
        filter: ListFilter,
    },
    /// Show one record
    Show { module: Module, id: RecordId },
    /// Show a module's stats
    Stats { module: Module },
    /// Create a record
    Add {
        module: Module,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Update a record. Fields not given keep their current value.
    Edit {
        module: Module,
        id: RecordId,
        #[command(flatten)]
        form: FormArgs,
    },
    /// Delete a record
    Delete { module: Module, id: RecordId },
    /// Name suggestions for a category. Without a category, list the categories.
    Suggest {
        module: Module,
        category: Option<String>,
    },
    /// Doctor dashboard
    #[command(subcommand)]
    Doctor(DoctorCommand),
    /// Hospital admin dashboard
    #[command(subcommand)]
    Hospital(HospitalCommand),
    /// Insurance dashboard
    #[command(subcommand)]
    Insurance(InsuranceCommand),
    /// Pharmacy patient requests
    #[command(subcommand)]
    Pharmacy(PharmacyCommand),
    /// Blood bank dashboard
    #[command(subcommand)]
    BloodBank(BloodBankCommand),
}

#[derive(ClapArgs, Debug, Default, Clone, PartialEq, Eq)]
pub struct ListFilter {
    /// Assessment type to show (assessments only)
    #[arg(long)]
    pub category: Option<String>,
    /// Search text (family history only)
    #[arg(long)]
    pub search: Option<String>,
    /// Relation filter (family history only)
    #[arg(long)]
    pub relation: Option<String>,
    /// Condition filter (family history only)
    #[arg(long)]
    pub condition: Option<String>,
    /// Days of history to show, 0 for all (vitals only)
    #[arg(long)]
    pub days: Option<u32>,
}

#[derive(ClapArgs, Debug, Default, Clone, PartialEq, Eq)]
pub struct FormArgs {
    /// Form field as `name=value`. Repeat for several fields; lists are comma separated.
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,
    /// File to upload with the record
    #[arg(long = "attach", value_name = "PATH")]
    pub attachments: Vec<PathBuf>,
}

/// Splits `name=value` at the first `=`.
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got `{s}`")),
    }
}

#[derive(Subcommand, Debug)]
pub enum DoctorCommand {
    /// Stats and today's queue
    Overview,
    /// All appointments
    Appointments {
        #[arg(long, default_value = "all")]
        filter: String,
    },
    /// Search patients by name, UID, email or phone
    Search { query: String },
    /// A patient's record summary
    Summary { uid: String },
    /// Send the patient an access OTP
    RequestAccess { uid: String },
    /// Verify the OTP the patient received
    VerifyAccess { uid: String, otp: String },
    /// Save a consultation note for a patient
    Consult {
        uid: String,
        #[arg(long, default_value = "")]
        subjective: String,
        #[arg(long, default_value = "")]
        objective: String,
        #[arg(long, default_value = "")]
        assessment: String,
        #[arg(long, default_value = "")]
        plan: String,
        /// Prescription as `name|dosage|frequency|duration|instructions`. Repeatable.
        #[arg(long = "rx", value_name = "LINE", value_parser = parse_prescription)]
        prescriptions: Vec<PrescriptionLine>,
        /// Lab test, suffixed `!` when urgent. Repeatable.
        #[arg(long = "lab", value_name = "TEST", value_parser = parse_lab_order)]
        lab_orders: Vec<LabOrder>,
    },
    /// A patient's medical history and record counts
    History { uid: String },
    /// Add a condition to a patient's medical history
    AddHistory {
        uid: String,
        /// chronic, past_illness, hospitalization, ncd, communicable, genetic or mental_health
        #[arg(long = "type")]
        record_type: String,
        #[arg(long)]
        condition: String,
        #[arg(long, default_value = "")]
        diagnosed: String,
        #[arg(long, default_value = "")]
        severity: String,
        /// The condition is resolved
        #[arg(long)]
        inactive: bool,
        #[arg(long, default_value = "")]
        treatment: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Delete a condition from a patient's medical history
    DeleteHistory { uid: String, id: RecordId },
    /// Vitals clinicians have taken for a patient
    Vitals { uid: String },
    /// Record a patient's vitals
    RecordVitals {
        uid: String,
        /// Blood pressure as `systolic/diastolic`
        #[arg(long, value_name = "S/D", value_parser = parse_blood_pressure)]
        bp: Option<(String, String)>,
        #[arg(long = "hr", default_value = "")]
        heart_rate: String,
        #[arg(long = "rr", default_value = "")]
        respiratory_rate: String,
        #[arg(long, default_value = "")]
        spo2: String,
        #[arg(long = "temp", default_value = "")]
        temperature: String,
        /// Pain score out of 10
        #[arg(long = "pain", default_value = "")]
        pain_score: String,
        #[arg(long = "sugar", default_value = "")]
        blood_sugar: String,
        #[arg(long, default_value = "")]
        weight: String,
        #[arg(long, default_value = "")]
        height: String,
        #[arg(long = "visit", default_value = "routine")]
        visit_type: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Investigations ordered for a patient
    Investigations { uid: String },
    /// Order a lab, imaging, pathology or microbiology investigation
    Order {
        uid: String,
        #[arg(long = "type", value_parser = parse_investigation_type)]
        investigation_type: InvestigationType,
        /// Test name
        #[arg(long)]
        test: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        urgent: bool,
        #[arg(long = "indication", default_value = "")]
        clinical_indication: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
}

/// Splits `120/80` into systolic and diastolic.
pub fn parse_blood_pressure(s: &str) -> Result<(String, String), String> {
    match s.split_once('/') {
        Some((systolic, diastolic))
            if !systolic.trim().is_empty() && !diastolic.trim().is_empty() =>
        {
            Ok((systolic.trim().to_string(), diastolic.trim().to_string()))
        }
        _ => Err(format!("expected SYSTOLIC/DIASTOLIC, got `{s}`")),
    }
}

pub fn parse_investigation_type(s: &str) -> Result<InvestigationType, String> {
    InvestigationType::parse(s)
        .ok_or_else(|| format!("expected lab, imaging, pathology or microbiology, got `{s}`"))
}

/// Splits `name|dosage|frequency|duration|instructions`; missing parts are empty.
pub fn parse_prescription(s: &str) -> Result<PrescriptionLine, String> {
    let mut parts = s.split('|').map(|p| p.trim().to_string());
    let line = PrescriptionLine {
        name: parts.next().unwrap_or_default(),
        dosage: parts.next().unwrap_or_default(),
        frequency: parts.next().unwrap_or_default(),
        duration: parts.next().unwrap_or_default(),
        instructions: parts.next().unwrap_or_default(),
    };
    if line.name.is_empty() {
        return Err(format!("expected a medicine name, got `{s}`"));
    }
    Ok(line)
}

/// `CBC` is routine, `CBC!` urgent.
pub fn parse_lab_order(s: &str) -> Result<LabOrder, String> {
    let (name, urgency) = match s.trim().strip_suffix('!') {
        Some(name) => (name, Urgency::Urgent),
        None => (s.trim(), Urgency::Routine),
    };
    if name.trim().is_empty() {
        return Err(format!("expected a test name, got `{s}`"));
    }
    Ok(LabOrder {
        test_name: name.trim().to_string(),
        urgency,
    })
}

#[derive(Subcommand, Debug)]
pub enum HospitalCommand {
    /// Stats, doctors and departments
    Overview,
    /// Register a doctor by health card UID
    AddDoctor {
        #[arg(long)]
        uid: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        specialty: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
    },
    /// Create a department
    AddDepartment {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        head: String,
    },
    /// Delete a department
    DeleteDepartment { id: RecordId },
    /// Revenue growth, department scores and recent activity
    Analytics,
}

#[derive(Subcommand, Debug)]
pub enum InsuranceCommand {
    /// Stats and alerts
    Overview,
    /// Policyholders
    Policyholders {
        #[arg(long, default_value = "Active")]
        status: String,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// Claims
    Claims {
        #[arg(long, default_value = "")]
        status: String,
        #[arg(long, default_value = "")]
        from: String,
        #[arg(long, default_value = "")]
        to: String,
    },
    /// One claim in full
    Claim { id: String },
    /// Approve or reject a claim
    Review {
        id: String,
        #[arg(long)]
        decision: String,
        #[arg(long, default_value = "")]
        amount: String,
        #[arg(long)]
        remarks: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum PharmacyCommand {
    /// Prescription uploads and medicine requests
    Requests,
    /// Move a request to its next status
    Update {
        id: RecordId,
        /// accepted, rejected, ready or completed
        #[arg(value_parser = parse_status)]
        status: RequestStatus,
        /// Reason for a rejection, or remarks for the patient
        #[arg(long)]
        remarks: Option<String>,
    },
}

pub fn parse_status(s: &str) -> Result<RequestStatus, String> {
    RequestStatus::parse(s).ok_or_else(|| format!("unknown request status `{s}`"))
}

#[derive(Subcommand, Debug)]
pub enum BloodBankCommand {
    /// Record units received into stock
    AddUnit {
        #[arg(long)]
        blood_group: String,
        #[arg(long, default_value = "Whole Blood")]
        component: String,
        #[arg(long)]
        quantity: String,
        #[arg(long, default_value = "")]
        expiry_date: String,
    },
    /// Approve or reject a hospital's blood request
    Process {
        id: RecordId,
        /// approve or reject
        #[arg(value_parser = parse_blood_action)]
        action: BloodRequestAction,
    },
}

pub fn parse_blood_action(s: &str) -> Result<BloodRequestAction, String> {
    BloodRequestAction::parse(s).ok_or_else(|| format!("expected approve or reject, got `{s}`"))
}

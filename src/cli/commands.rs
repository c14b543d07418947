use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "ubs360")]
#[command(about = "Primary-care unit console: patient registry, care records and Brasil 360 indicators")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI dashboard
    Tui,

    /// Write a default configuration file
    Init {
        /// Destination of the generated file
        #[arg(default_value = "ubs360.toml")]
        path: String,
    },

    /// Log in and persist the session
    Login {
        #[arg(short, long)]
        email: String,

        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Clear the persisted session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Patient registry
    Patients {
        #[command(subcommand)]
        action: PatientCommands,
    },

    /// Register a new patient
    Register(RegisterArgs),

    /// Appointment scheduling
    Appointments {
        #[command(subcommand)]
        action: AppointmentCommands,
    },

    /// Record a home visit, with optional vitals
    Visit {
        #[arg(long)]
        patient: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: String,

        #[arg(long)]
        reason: String,

        #[arg(long)]
        notes: Option<String>,

        #[command(flatten)]
        vitals: VitalsArgs,
    },

    /// List home visits
    Visits {
        #[arg(long)]
        patient: Option<String>,
    },

    /// Vaccination records
    Vaccines {
        #[command(subcommand)]
        action: VaccineCommands,
    },

    /// Lab exams
    Exams {
        #[command(subcommand)]
        action: ExamCommands,
    },

    /// Record a hypertension or diabetes consultation
    Consult {
        #[arg(value_enum)]
        program: ChronicArg,

        #[arg(long)]
        patient: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: String,

        #[command(flatten)]
        vitals: VitalsArgs,

        #[arg(long, default_value = "")]
        glycemia: String,

        #[arg(long, default_value = "")]
        hba1c: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Show Brasil 360 indicators
    Indicators {
        /// Single program, e.g. prenatal or woman-health
        program: Option<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// List notifications or mark them as read
    Notifications {
        /// Mark one notification as read
        #[arg(long)]
        mark_read: Option<String>,

        /// Mark every notification as read
        #[arg(long)]
        all: bool,
    },

    /// Manage users
    Users {
        #[command(subcommand)]
        action: UserCommands,
    },

    /// List micro-areas and their agents
    MicroAreas,

    /// Compute age-derived program flags offline
    Eligibility {
        /// Birth date, YYYY-MM-DD
        birth_date: String,

        /// Reference date instead of today (UTC)
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum PatientCommands {
    /// Search and filter the registry
    List {
        /// Name, CPF or CNS
        #[arg(short, long)]
        search: Option<String>,

        #[arg(long)]
        micro_area: Option<String>,

        #[arg(long)]
        agent: Option<String>,

        /// child, pregnant, postpartum, hypertension, diabetes, elderly, woman
        #[arg(long)]
        group: Option<String>,

        /// active, inactive or all
        #[arg(long, default_value = "active")]
        status: String,

        #[arg(long)]
        min_age: Option<u32>,

        #[arg(long)]
        max_age: Option<u32>,

        #[arg(long, default_value = "1")]
        page: u32,

        #[arg(long, default_value = "20")]
        limit: u32,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one patient with vaccines and exams
    Show {
        id: String,

        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show the patient's care history
    Timeline { id: String },

    /// Edit a patient; fields not given keep their current value
    Edit(EditArgs),

    /// Soft-delete a patient
    Inactivate {
        id: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum AppointmentCommands {
    /// List appointments, optionally for one patient
    List {
        #[arg(long)]
        patient: Option<String>,

        #[arg(long, default_value = "1")]
        page: u32,
    },

    /// Schedule an appointment
    Create {
        #[arg(long)]
        patient: String,

        /// RFC 3339 timestamp, e.g. 2026-10-20T13:00:00Z
        #[arg(long)]
        at: String,

        #[arg(long = "type", default_value = "CONSULTA")]
        kind: String,

        #[arg(long)]
        notes: Option<String>,
    },

    /// Set status: scheduled, completed, cancelled or absent
    Status {
        id: String,

        #[arg(long)]
        patient: String,

        status: String,
    },
}

#[derive(Subcommand)]
pub enum VaccineCommands {
    /// Vaccination card of one patient
    List { patient: String },

    /// Record an applied dose
    Record {
        #[arg(long)]
        patient: String,

        #[arg(long)]
        vaccine: String,

        #[arg(long)]
        dose: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date: String,
    },
}

#[derive(Subcommand)]
pub enum ExamCommands {
    /// Exams of one patient
    List { patient: String },

    /// Record an exam request, optionally with its result
    Record {
        #[arg(long)]
        patient: String,

        #[arg(long)]
        name: String,

        /// YYYY-MM-DD
        #[arg(long)]
        requested: String,

        /// YYYY-MM-DD
        #[arg(long, default_value = "")]
        result_date: String,

        #[arg(long, default_value = "")]
        result: String,
    },
}

#[derive(Subcommand)]
pub enum UserCommands {
    List,

    /// Change a user's details; fields not given keep their current value
    Update {
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        micro_area: Option<String>,
    },

    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// ADMIN, MANAGER, DOCTOR, NURSE, DENTIST, TECHNICIAN or ACS
        #[arg(long)]
        role: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        micro_area: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ChronicArg {
    Hypertension,
    Diabetes,
}

#[derive(Args, Default)]
pub struct VitalsArgs {
    #[arg(long, default_value = "")]
    pub weight: String,

    #[arg(long, default_value = "")]
    pub height: String,

    #[arg(long, default_value = "")]
    pub systolic: String,

    #[arg(long, default_value = "")]
    pub diastolic: String,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,

    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: String,

    /// M or F
    #[arg(long)]
    pub sex: String,

    #[arg(long, default_value = "")]
    pub social_name: String,

    #[arg(long, default_value = "")]
    pub cpf: String,

    #[arg(long, default_value = "")]
    pub cns: String,

    #[arg(long, default_value = "")]
    pub mother_name: String,

    #[arg(long, default_value = "")]
    pub phone: String,

    #[arg(long)]
    pub street: String,

    #[arg(long, default_value = "")]
    pub number: String,

    #[arg(long, default_value = "")]
    pub neighborhood: String,

    #[arg(long, default_value = "")]
    pub city: String,

    #[arg(long, default_value = "")]
    pub zip: String,

    #[arg(long, default_value = "")]
    pub micro_area: String,

    #[arg(long)]
    pub pregnant: bool,

    #[arg(long)]
    pub postpartum: bool,

    #[arg(long)]
    pub hypertension: bool,

    #[arg(long)]
    pub diabetes: bool,

    #[arg(long)]
    pub woman: bool,
}

#[derive(Args)]
pub struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    /// YYYY-MM-DD
    #[arg(long)]
    pub birth_date: Option<String>,

    /// M or F
    #[arg(long)]
    pub sex: Option<String>,

    #[arg(long)]
    pub social_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub number: Option<String>,

    #[arg(long)]
    pub neighborhood: Option<String>,

    #[arg(long)]
    pub city: Option<String>,

    #[arg(long)]
    pub zip: Option<String>,

    #[arg(long)]
    pub micro_area: Option<String>,

    #[arg(long)]
    pub pregnant: Option<bool>,

    #[arg(long)]
    pub postpartum: Option<bool>,

    #[arg(long)]
    pub hypertension: Option<bool>,

    #[arg(long)]
    pub diabetes: Option<bool>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    Absent,
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "Agendado"),
            AppointmentStatus::Completed => write!(f, "Realizado"),
            AppointmentStatus::Cancelled => write!(f, "Cancelado"),
            AppointmentStatus::Absent => write!(f, "Faltou"),
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SCHEDULED" => Ok(AppointmentStatus::Scheduled),
            "COMPLETED" => Ok(AppointmentStatus::Completed),
            "CANCELLED" => Ok(AppointmentStatus::Cancelled),
            "ABSENT" => Ok(AppointmentStatus::Absent),
            other => Err(format!("unknown appointment status {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub professional_id: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewAppointment {
    pub patient_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_id: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vitals {
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub systolic: Option<u32>,
    #[serde(default)]
    pub diastolic: Option<u32>,
}

impl Vitals {
    pub fn has_anthropometry(&self) -> bool {
        self.weight.is_some() || self.height.is_some()
    }

    pub fn has_blood_pressure(&self) -> bool {
        self.systolic.is_some() && self.diastolic.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomeVisit {
    pub id: String,
    pub patient_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    pub visit_date: NaiveDate,
    pub reason: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewHomeVisit {
    pub patient_id: String,
    pub visit_date: NaiveDate,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Posted to the shared-action endpoints, never with the visit itself
    #[serde(skip)]
    pub vitals: Vitals,
}

/// Body of POST /shared-actions/anthropometry.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnthropometryAction {
    pub patient_id: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

/// Body of POST /shared-actions/blood-pressure.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BloodPressureAction {
    pub patient_id: String,
    pub date: NaiveDate,
    pub systolic: u32,
    pub diastolic: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChronicProgram {
    Hypertension,
    Diabetes,
}

impl ChronicProgram {
    pub fn path(&self) -> &'static str {
        match self {
            ChronicProgram::Hypertension => "/hypertension",
            ChronicProgram::Diabetes => "/diabetes",
        }
    }
}

/// Chronic consultation with every numeric field already coerced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChronicConsultation {
    pub patient_id: String,
    pub consultation_date: NaiveDate,
    pub systolic: Option<u32>,
    pub diastolic: Option<u32>,
    pub weight: Option<f64>,
    pub height: Option<f64>,
    pub glycemia: Option<f64>,
    pub hba1c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VaccineRecord {
    pub id: String,
    pub patient_id: String,
    pub vaccine: String,
    pub dose: String,
    #[serde(default)]
    pub applied_at: Option<NaiveDate>,
    #[serde(default)]
    pub scheduled_for: Option<NaiveDate>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewVaccineRecord {
    pub patient_id: String,
    pub vaccine: String,
    pub dose: String,
    pub applied_at: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: String,
    pub patient_id: String,
    pub name: String,
    pub requested_at: NaiveDate,
    #[serde(default)]
    pub result_at: Option<NaiveDate>,
    #[serde(default)]
    pub result: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewExam {
    pub patient_id: String,
    pub name: String,
    pub requested_at: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_at: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl std::str::FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "M" | "MALE" | "MASCULINO" => Ok(Sex::Male),
            "F" | "FEMALE" | "FEMININO" => Ok(Sex::Female),
            other => Err(format!("unknown sex {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub number: String,
    #[serde(default)]
    pub neighborhood: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
}

/// Program-membership flags carried on every patient record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityFlags {
    #[serde(default)]
    pub is_child: bool,
    #[serde(default)]
    pub is_pregnant: bool,
    #[serde(default)]
    pub is_postpartum: bool,
    #[serde(default)]
    pub has_hypertension: bool,
    #[serde(default)]
    pub has_diabetes: bool,
    #[serde(default)]
    pub is_elderly: bool,
    #[serde(default)]
    pub is_woman: bool,
}

impl EligibilityFlags {
    /// Short labels of the groups this patient belongs to.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.is_child {
            labels.push("Criança");
        }
        if self.is_pregnant {
            labels.push("Gestante");
        }
        if self.is_postpartum {
            labels.push("Puérpera");
        }
        if self.has_hypertension {
            labels.push("HAS");
        }
        if self.has_diabetes {
            labels.push("DM");
        }
        if self.is_elderly {
            labels.push("Idoso");
        }
        if self.is_woman {
            labels.push("Mulher");
        }
        labels
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub social_name: Option<String>,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub cns: Option<String>,
    pub birth_date: String,
    pub sex: Sex,
    #[serde(default)]
    pub mother_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Address,
    #[serde(default)]
    pub micro_area_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(flatten)]
    pub flags: EligibilityFlags,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_active() -> bool {
    true
}

/// Body of POST /patients and PUT /patients/:id.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PatientPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cns: Option<String>,
    pub birth_date: String,
    pub sex: Sex,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub micro_area_id: Option<String>,
    #[serde(flatten)]
    pub flags: EligibilityFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EligibilityGroup {
    Child,
    Pregnant,
    Postpartum,
    Hypertension,
    Diabetes,
    Elderly,
    Woman,
}

impl EligibilityGroup {
    pub fn as_query_value(&self) -> &'static str {
        match self {
            EligibilityGroup::Child => "CHILD",
            EligibilityGroup::Pregnant => "PREGNANT",
            EligibilityGroup::Postpartum => "POSTPARTUM",
            EligibilityGroup::Hypertension => "HYPERTENSION",
            EligibilityGroup::Diabetes => "DIABETES",
            EligibilityGroup::Elderly => "ELDERLY",
            EligibilityGroup::Woman => "WOMAN",
        }
    }
}

impl std::str::FromStr for EligibilityGroup {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "child" => Ok(EligibilityGroup::Child),
            "pregnant" => Ok(EligibilityGroup::Pregnant),
            "postpartum" => Ok(EligibilityGroup::Postpartum),
            "hypertension" => Ok(EligibilityGroup::Hypertension),
            "diabetes" => Ok(EligibilityGroup::Diabetes),
            "elderly" => Ok(EligibilityGroup::Elderly),
            "woman" => Ok(EligibilityGroup::Woman),
            other => Err(format!("unknown eligibility group {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PatientStatusFilter {
    #[default]
    Active,
    Inactive,
    All,
}

impl std::str::FromStr for PatientStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(PatientStatusFilter::Active),
            "inactive" => Ok(PatientStatusFilter::Inactive),
            "all" => Ok(PatientStatusFilter::All),
            other => Err(format!("unknown status {:?}", other)),
        }
    }
}

/// Query for GET /patients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientQuery {
    pub page: u32,
    pub limit: u32,
    /// Matches name, CPF or CNS on the backend
    pub search: Option<String>,
    pub micro_area_id: Option<String>,
    pub agent_id: Option<String>,
    pub group: Option<EligibilityGroup>,
    pub status: PatientStatusFilter,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

impl Default for PatientQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            search: None,
            micro_area_id: None,
            agent_id: None,
            group: None,
            status: PatientStatusFilter::Active,
            min_age: None,
            max_age: None,
        }
    }
}

impl PatientQuery {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            params.push(("search", search.to_string()));
        }
        if let Some(id) = &self.micro_area_id {
            params.push(("microAreaId", id.clone()));
        }
        if let Some(id) = &self.agent_id {
            params.push(("agentId", id.clone()));
        }
        if let Some(group) = self.group {
            params.push(("group", group.as_query_value().to_string()));
        }
        match self.status {
            PatientStatusFilter::Active => params.push(("status", "active".to_string())),
            PatientStatusFilter::Inactive => params.push(("status", "inactive".to_string())),
            PatientStatusFilter::All => {}
        }
        if let Some(min) = self.min_age {
            params.push(("minAge", min.to_string()));
        }
        if let Some(max) = self.max_age {
            params.push(("maxAge", max.to_string()));
        }
        params
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub date: DateTime<Utc>,
    pub kind: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patient_decodes_flattened_flags() {
        let json = serde_json::json!({
            "id": "p1",
            "name": "Maria da Silva",
            "birthDate": "1950-03-10",
            "sex": "F",
            "isElderly": true,
            "hasHypertension": true,
            "isWoman": true
        });
        let patient: Patient = serde_json::from_value(json).unwrap();
        assert!(patient.active);
        assert!(patient.flags.is_elderly);
        assert!(!patient.flags.is_child);
        assert_eq!(patient.flags.labels(), vec!["HAS", "Idoso", "Mulher"]);
    }

    #[test]
    fn test_query_params_skip_empty_filters() {
        let query = PatientQuery {
            search: Some("  ".to_string()),
            group: Some(EligibilityGroup::Diabetes),
            status: PatientStatusFilter::All,
            min_age: Some(18),
            ..Default::default()
        };
        let params = query.to_params();
        assert!(params.iter().all(|(k, _)| *k != "search" && *k != "status"));
        assert!(params.contains(&("group", "DIABETES".to_string())));
        assert!(params.contains(&("minAge", "18".to_string())));
    }
}

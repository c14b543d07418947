use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Program {
    Prenatal,
    Childcare,
    Diabetes,
    Hypertension,
    Elderly,
    WomanHealth,
}

impl Program {
    pub const ALL: [Program; 6] = [
        Program::Prenatal,
        Program::Childcare,
        Program::Diabetes,
        Program::Hypertension,
        Program::Elderly,
        Program::WomanHealth,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Program::Prenatal => "prenatal",
            Program::Childcare => "childcare",
            Program::Diabetes => "diabetes",
            Program::Hypertension => "hypertension",
            Program::Elderly => "elderly",
            Program::WomanHealth => "woman-health",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Program::Prenatal => "Pré-natal",
            Program::Childcare => "Puericultura",
            Program::Diabetes => "Diabetes",
            Program::Hypertension => "Hipertensão",
            Program::Elderly => "Pessoa idosa",
            Program::WomanHealth => "Saúde da mulher",
        }
    }
}

impl std::str::FromStr for Program {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        Program::ALL
            .into_iter()
            .find(|p| p.slug() == normalized)
            .ok_or_else(|| format!("unknown program {:?}", s))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorStatus {
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub code: String,
    pub description: String,
    pub status: IndicatorStatus,
}

/// Backend-computed checklist for one program.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    pub program: Program,
    #[serde(default)]
    pub patient_count: u32,
    pub criteria: Vec<Criterion>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub green: usize,
    pub yellow: usize,
    pub red: usize,
}

impl Indicator {
    pub fn tally(&self) -> StatusTally {
        self.criteria.iter().fold(StatusTally::default(), |mut tally, c| {
            match c.status {
                IndicatorStatus::Green => tally.green += 1,
                IndicatorStatus::Yellow => tally.yellow += 1,
                IndicatorStatus::Red => tally.red += 1,
            }
            tally
        })
    }
}

/// GET /dashboard/summary
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(default)]
    pub total_patients: u64,
    #[serde(default)]
    pub appointments_today: u64,
    #[serde(default)]
    pub home_visits_month: u64,
    #[serde(default)]
    pub pending_exams: u64,
    #[serde(default)]
    pub patients_by_group: Vec<GroupCount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupCount {
    pub group: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_counts_each_status() {
        let indicator: Indicator = serde_json::from_value(serde_json::json!({
            "program": "WOMAN_HEALTH",
            "criteria": [
                {"code": "C1", "description": "Citopatológico", "status": "GREEN"},
                {"code": "C2", "description": "Mamografia", "status": "RED"},
                {"code": "C3", "description": "HPV", "status": "RED"}
            ]
        }))
        .unwrap();
        assert_eq!(indicator.program, Program::WomanHealth);
        assert_eq!(indicator.tally(), StatusTally { green: 1, yellow: 0, red: 2 });
    }

    #[test]
    fn test_program_parses_slug_and_snake() {
        assert_eq!("woman_health".parse::<Program>(), Ok(Program::WomanHealth));
        assert_eq!("Childcare".parse::<Program>(), Ok(Program::Childcare));
        assert!("dental".parse::<Program>().is_err());
    }
}

use chrono::NaiveDate;

use crate::{
    error::{AppError, Result},
    forms::validators,
    models::{ChronicConsultation, ChronicProgram, NewExam, NewHomeVisit, NewVaccineRecord, Vitals},
};

/// Chronic-care consultation as typed in the form; every number is still text.
#[derive(Debug, Clone, Default)]
pub struct ChronicForm {
    pub patient_id: String,
    pub date: String,
    pub systolic: String,
    pub diastolic: String,
    pub weight: String,
    pub height: String,
    pub glycemia: String,
    pub hba1c: String,
    pub notes: String,
}

impl ChronicForm {
    /// Coerce the text fields into the request body.
    pub fn to_payload(&self, program: ChronicProgram) -> Result<ChronicConsultation> {
        let mut errors = Vec::new();

        let consultation_date = parse_date("date", &self.date, &mut errors);
        let systolic = collect("systolic", validators::whole(&self.systolic), &mut errors);
        let diastolic = collect("diastolic", validators::whole(&self.diastolic), &mut errors);
        let weight = collect("weight", validators::decimal(&self.weight), &mut errors);
        let height = collect("height", validators::decimal(&self.height), &mut errors);
        let glycemia = collect("glycemia", validators::decimal(&self.glycemia), &mut errors);
        let hba1c = collect("hba1c", validators::decimal(&self.hba1c), &mut errors);

        if systolic.is_some() != diastolic.is_some() {
            errors.push("diastolic: informe sistólica e diastólica juntas".to_string());
        }
        if program == ChronicProgram::Hypertension && systolic.is_none() {
            errors.push("systolic: obrigatório para hipertensão".to_string());
        }
        if program == ChronicProgram::Diabetes && glycemia.is_none() && hba1c.is_none() {
            errors.push("glycemia: informe glicemia ou HbA1c".to_string());
        }

        match consultation_date {
            Some(consultation_date) if errors.is_empty() => Ok(ChronicConsultation {
                patient_id: self.patient_id.clone(),
                consultation_date,
                systolic,
                diastolic,
                weight,
                height,
                glycemia,
                hba1c,
                notes: validators::optional(&self.notes),
            }),
            _ => Err(AppError::Validation(errors.join("\n"))),
        }
    }
}

/// Home visit as typed, with optional vitals.
#[derive(Debug, Clone, Default)]
pub struct HomeVisitForm {
    pub patient_id: String,
    pub date: String,
    pub reason: String,
    pub notes: String,
    pub weight: String,
    pub height: String,
    pub systolic: String,
    pub diastolic: String,
}

impl HomeVisitForm {
    pub fn to_payload(&self) -> Result<NewHomeVisit> {
        let mut errors = Vec::new();

        let visit_date = parse_date("date", &self.date, &mut errors);
        if self.reason.trim().is_empty() {
            errors.push("reason: obrigatório".to_string());
        }
        let vitals = Vitals {
            weight: collect("weight", validators::decimal(&self.weight), &mut errors),
            height: collect("height", validators::decimal(&self.height), &mut errors),
            systolic: collect("systolic", validators::whole(&self.systolic), &mut errors),
            diastolic: collect("diastolic", validators::whole(&self.diastolic), &mut errors),
        };
        if vitals.systolic.is_some() != vitals.diastolic.is_some() {
            errors.push("diastolic: informe sistólica e diastólica juntas".to_string());
        }

        match visit_date {
            Some(visit_date) if errors.is_empty() => Ok(NewHomeVisit {
                patient_id: self.patient_id.clone(),
                visit_date,
                reason: self.reason.trim().to_string(),
                notes: validators::optional(&self.notes),
                vitals,
            }),
            _ => Err(AppError::Validation(errors.join("\n"))),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VaccineForm {
    pub patient_id: String,
    pub vaccine: String,
    pub dose: String,
    pub applied_at: String,
}

impl VaccineForm {
    pub fn to_payload(&self) -> Result<NewVaccineRecord> {
        let mut errors = Vec::new();

        let applied_at = parse_date("appliedAt", &self.applied_at, &mut errors);
        if self.vaccine.trim().is_empty() {
            errors.push("vaccine: obrigatório".to_string());
        }
        if self.dose.trim().is_empty() {
            errors.push("dose: obrigatório".to_string());
        }

        match applied_at {
            Some(applied_at) if errors.is_empty() => Ok(NewVaccineRecord {
                patient_id: self.patient_id.clone(),
                vaccine: self.vaccine.trim().to_string(),
                dose: self.dose.trim().to_string(),
                applied_at,
            }),
            _ => Err(AppError::Validation(errors.join("\n"))),
        }
    }
}

/// Exam request, optionally with its result already in hand.
#[derive(Debug, Clone, Default)]
pub struct ExamForm {
    pub patient_id: String,
    pub name: String,
    pub requested_at: String,
    pub result_at: String,
    pub result: String,
}

impl ExamForm {
    pub fn to_payload(&self) -> Result<NewExam> {
        let mut errors = Vec::new();

        let requested_at = parse_date("requestedAt", &self.requested_at, &mut errors);
        if self.name.trim().is_empty() {
            errors.push("name: obrigatório".to_string());
        }
        let result_at = match self.result_at.trim() {
            "" => None,
            raw => parse_date("resultAt", raw, &mut errors),
        };
        if let (Some(requested), Some(result)) = (requested_at, result_at) {
            if result < requested {
                errors.push("resultAt: anterior à data de solicitação".to_string());
            }
        }

        match requested_at {
            Some(requested_at) if errors.is_empty() => Ok(NewExam {
                patient_id: self.patient_id.clone(),
                name: self.name.trim().to_string(),
                requested_at,
                result_at,
                result: validators::optional(&self.result),
            }),
            _ => Err(AppError::Validation(errors.join("\n"))),
        }
    }
}

fn parse_date(field: &str, raw: &str, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let parsed = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok();
    if parsed.is_none() {
        errors.push(format!("{}: data inválida (use AAAA-MM-DD)", field));
    }
    parsed
}

fn collect<T>(
    field: &str,
    value: std::result::Result<Option<T>, String>,
    errors: &mut Vec<String>,
) -> Option<T> {
    match value {
        Ok(v) => v,
        Err(e) => {
            errors.push(format!("{}: {}", field, e));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chronic_numbers_are_coerced() {
        let form = ChronicForm {
            patient_id: "p1".to_string(),
            date: "2026-10-01".to_string(),
            systolic: "140".to_string(),
            diastolic: " 90 ".to_string(),
            weight: "81,4".to_string(),
            ..Default::default()
        };
        let payload = form.to_payload(ChronicProgram::Hypertension).unwrap();
        assert_eq!(payload.systolic, Some(140));
        assert_eq!(payload.diastolic, Some(90));
        assert_eq!(payload.weight, Some(81.4));
        assert_eq!(payload.glycemia, None);

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["systolic"], 140);
        assert!(json["glycemia"].is_null());
    }

    #[test]
    fn test_chronic_reports_every_bad_field() {
        let form = ChronicForm {
            patient_id: "p1".to_string(),
            date: "01/10/2026".to_string(),
            systolic: "alta".to_string(),
            glycemia: "x".to_string(),
            ..Default::default()
        };
        let Err(AppError::Validation(text)) = form.to_payload(ChronicProgram::Diabetes) else {
            panic!("expected validation error");
        };
        assert!(text.contains("date:"));
        assert!(text.contains("systolic:"));
        assert!(text.contains("glycemia:"));
    }

    #[test]
    fn test_home_visit_vitals() {
        let form = HomeVisitForm {
            patient_id: "p1".to_string(),
            date: "2026-10-10".to_string(),
            reason: "Busca ativa".to_string(),
            systolic: "120".to_string(),
            diastolic: "80".to_string(),
            ..Default::default()
        };
        let visit = form.to_payload().unwrap();
        assert!(visit.vitals.has_blood_pressure());
        assert!(!visit.vitals.has_anthropometry());

        let half = HomeVisitForm { diastolic: String::new(), ..form };
        assert!(half.to_payload().is_err());
    }

    #[test]
    fn test_vaccine_requires_name_dose_and_date() {
        let form = VaccineForm {
            patient_id: "p1".to_string(),
            vaccine: " Pentavalente ".to_string(),
            dose: "2ª dose".to_string(),
            applied_at: "2026-09-30".to_string(),
        };
        let record = form.to_payload().unwrap();
        assert_eq!(record.vaccine, "Pentavalente");
        assert_eq!(record.applied_at, NaiveDate::from_ymd_opt(2026, 9, 30).unwrap());

        let empty = VaccineForm { patient_id: "p1".to_string(), ..Default::default() };
        let Err(AppError::Validation(text)) = empty.to_payload() else {
            panic!("expected validation error");
        };
        assert!(text.contains("appliedAt:"));
        assert!(text.contains("vaccine:"));
        assert!(text.contains("dose:"));
    }

    #[test]
    fn test_exam_result_is_optional_but_not_before_request() {
        let pending = ExamForm {
            patient_id: "p1".to_string(),
            name: "Hemoglobina glicada".to_string(),
            requested_at: "2026-10-01".to_string(),
            ..Default::default()
        };
        let exam = pending.to_payload().unwrap();
        assert_eq!(exam.result_at, None);
        assert_eq!(exam.result, None);

        let backwards = ExamForm {
            result_at: "2026-09-01".to_string(),
            result: "6,8%".to_string(),
            ..pending
        };
        assert!(backwards.to_payload().is_err());
    }
}

//! Patient registration as a step state machine.
//!
//! The only way to obtain a [`PatientPayload`] is [`RegistrationWizard::advance`]
//! out of [`Step::Review`]. Child and elderly flags are not part of the draft:
//! they are computed from the birth date when the payload is built.

use chrono::NaiveDate;

use crate::{
    eligibility::{parse_birth_date, AgeFlags, EligibilityCalculator},
    error::{AppError, Result},
    forms::validators,
    models::{Address, EligibilityFlags, Patient, PatientPayload, Sex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Identification,
    Address,
    Clinical,
    Review,
}

impl Step {
    pub const ALL: [Step; 4] = [Step::Identification, Step::Address, Step::Clinical, Step::Review];

    pub fn title(&self) -> &'static str {
        match self {
            Step::Identification => "Identificação",
            Step::Address => "Endereço",
            Step::Clinical => "Condições",
            Step::Review => "Revisão",
        }
    }

    pub fn index(&self) -> usize {
        Step::ALL.iter().position(|s| s == self).unwrap_or(0)
    }

    fn next(&self) -> Option<Step> {
        Step::ALL.get(self.index() + 1).copied()
    }

    fn previous(&self) -> Option<Step> {
        self.index().checked_sub(1).map(|i| Step::ALL[i])
    }
}

/// User-editable fields, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationDraft {
    pub name: String,
    pub social_name: String,
    pub cpf: String,
    pub cns: String,
    pub birth_date: String,
    pub sex: Option<Sex>,
    pub mother_name: String,
    pub phone: String,
    pub address: Address,
    pub micro_area_id: String,
    pub is_pregnant: bool,
    pub is_postpartum: bool,
    pub has_hypertension: bool,
    pub has_diabetes: bool,
    pub is_woman: bool,
}

impl RegistrationDraft {
    pub fn from_patient(patient: &Patient) -> Self {
        Self {
            name: patient.name.clone(),
            social_name: patient.social_name.clone().unwrap_or_default(),
            cpf: patient.cpf.clone().unwrap_or_default(),
            cns: patient.cns.clone().unwrap_or_default(),
            birth_date: patient.birth_date.clone(),
            sex: Some(patient.sex),
            mother_name: patient.mother_name.clone().unwrap_or_default(),
            phone: patient.phone.clone().unwrap_or_default(),
            address: patient.address.clone(),
            micro_area_id: patient.micro_area_id.clone().unwrap_or_default(),
            is_pregnant: patient.flags.is_pregnant,
            is_postpartum: patient.flags.is_postpartum,
            has_hypertension: patient.flags.has_hypertension,
            has_diabetes: patient.flags.has_diabetes,
            is_woman: patient.flags.is_woman,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Moved(Step),
    Submit(PatientPayload),
}

pub struct RegistrationWizard {
    step: Step,
    draft: RegistrationDraft,
    /// Set when editing an existing record
    patient_id: Option<String>,
    calculator: EligibilityCalculator,
}

impl RegistrationWizard {
    pub fn new(calculator: EligibilityCalculator) -> Self {
        Self {
            step: Step::Identification,
            draft: RegistrationDraft::default(),
            patient_id: None,
            calculator,
        }
    }

    pub fn editing(patient: &Patient, calculator: EligibilityCalculator) -> Self {
        Self {
            step: Step::Identification,
            draft: RegistrationDraft::from_patient(patient),
            patient_id: Some(patient.id.clone()),
            calculator,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut RegistrationDraft {
        &mut self.draft
    }

    /// Flags as they would be submitted right now, for display.
    pub fn preview_flags(&self) -> AgeFlags {
        self.calculator.flags(&self.draft.birth_date)
    }

    /// Validate the current step and move on; out of `Review` this yields the payload.
    pub fn advance(&mut self) -> Result<Advance> {
        let errors = self.step_errors(self.step);
        if !errors.is_empty() {
            return Err(AppError::Validation(errors.join("\n")));
        }

        match self.step.next() {
            Some(next) => {
                self.step = next;
                Ok(Advance::Moved(next))
            }
            None => Ok(Advance::Submit(self.build_payload()?)),
        }
    }

    /// Go back one step. Returns false on the first step.
    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    fn step_errors(&self, step: Step) -> Vec<String> {
        let d = &self.draft;
        let mut errors = Vec::new();

        match step {
            Step::Identification => {
                if d.name.trim().len() < 3 {
                    errors.push("name: informe o nome completo".to_string());
                }
                match parse_birth_date(&d.birth_date) {
                    None => errors.push("birthDate: data inválida (use AAAA-MM-DD)".to_string()),
                    Some(date) if date > self.calculator.today() => {
                        errors.push("birthDate: data no futuro".to_string())
                    }
                    Some(_) => {}
                }
                if d.sex.is_none() {
                    errors.push("sex: obrigatório".to_string());
                }
                if !d.cpf.trim().is_empty() {
                    if let Err(e) = validators::cpf(&d.cpf) {
                        errors.push(format!("cpf: {}", e));
                    }
                }
                if !d.cns.trim().is_empty() {
                    if let Err(e) = validators::cns(&d.cns) {
                        errors.push(format!("cns: {}", e));
                    }
                }
            }
            Step::Address => {
                if d.address.street.trim().is_empty() {
                    errors.push("street: obrigatório".to_string());
                }
                if !d.address.zip_code.trim().is_empty() {
                    if let Err(e) = validators::zip_code(&d.address.zip_code) {
                        errors.push(format!("zipCode: {}", e));
                    }
                }
            }
            Step::Clinical => {
                let female = d.sex == Some(Sex::Female);
                if (d.is_pregnant || d.is_postpartum) && !female {
                    errors.push("isPregnant: apenas para pacientes do sexo feminino".to_string());
                }
                if d.is_pregnant && d.is_postpartum {
                    errors.push("isPostpartum: não pode ser gestante e puérpera".to_string());
                }
            }
            Step::Review => {
                for earlier in [Step::Identification, Step::Address, Step::Clinical] {
                    errors.extend(self.step_errors(earlier));
                }
            }
        }
        errors
    }

    fn build_payload(&self) -> Result<PatientPayload> {
        let d = &self.draft;
        let birth: NaiveDate = parse_birth_date(&d.birth_date)
            .ok_or_else(|| AppError::Validation("birthDate: data inválida".to_string()))?;
        let sex = d
            .sex
            .ok_or_else(|| AppError::Validation("sex: obrigatório".to_string()))?;
        let age = self.calculator.flags(&birth.to_string());

        let mut address = d.address.clone();
        address.zip_code = validators::digits(&address.zip_code);

        Ok(PatientPayload {
            name: d.name.trim().to_string(),
            social_name: validators::optional(&d.social_name),
            cpf: validators::optional(&d.cpf).map(|c| validators::digits(&c)),
            cns: validators::optional(&d.cns).map(|c| validators::digits(&c)),
            birth_date: birth.to_string(),
            sex,
            mother_name: validators::optional(&d.mother_name),
            phone: validators::optional(&d.phone),
            address,
            micro_area_id: validators::optional(&d.micro_area_id),
            flags: EligibilityFlags {
                is_child: age.is_child,
                is_elderly: age.is_elderly,
                is_pregnant: d.is_pregnant,
                is_postpartum: d.is_postpartum,
                has_hypertension: d.has_hypertension,
                has_diabetes: d.has_diabetes,
                is_woman: d.is_woman,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> EligibilityCalculator {
        EligibilityCalculator::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap())
    }

    fn filled(wizard: &mut RegistrationWizard) {
        let d = wizard.draft_mut();
        d.name = "João Pereira".to_string();
        d.birth_date = "1950-01-20".to_string();
        d.sex = Some(Sex::Male);
        d.cpf = "529.982.247-25".to_string();
        d.address.street = "Rua das Flores".to_string();
        d.address.zip_code = "01310-100".to_string();
        d.has_hypertension = true;
    }

    #[test]
    fn test_steps_advance_in_order_and_review_submits() {
        let mut wizard = RegistrationWizard::new(calculator());
        filled(&mut wizard);

        assert_eq!(wizard.advance().unwrap(), Advance::Moved(Step::Address));
        assert_eq!(wizard.advance().unwrap(), Advance::Moved(Step::Clinical));
        assert_eq!(wizard.advance().unwrap(), Advance::Moved(Step::Review));

        let Advance::Submit(payload) = wizard.advance().unwrap() else {
            panic!("review must submit");
        };
        assert_eq!(payload.cpf.as_deref(), Some("52998224725"));
        assert_eq!(payload.address.zip_code, "01310100");
        assert!(payload.flags.is_elderly);
        assert!(!payload.flags.is_child);
        assert!(payload.flags.has_hypertension);
    }

    #[test]
    fn test_invalid_step_does_not_move() {
        let mut wizard = RegistrationWizard::new(calculator());
        wizard.draft_mut().cpf = "123".to_string();

        let err = wizard.advance().unwrap_err();
        let AppError::Validation(text) = err else {
            panic!("expected validation error");
        };
        assert!(text.contains("name:"));
        assert!(text.contains("birthDate:"));
        assert!(text.contains("cpf: deve ter 11 dígitos"));
        assert_eq!(wizard.step(), Step::Identification);
    }

    #[test]
    fn test_back_stops_at_first_step() {
        let mut wizard = RegistrationWizard::new(calculator());
        filled(&mut wizard);
        wizard.advance().unwrap();
        assert!(wizard.back());
        assert_eq!(wizard.step(), Step::Identification);
        assert!(!wizard.back());
    }

    #[test]
    fn test_age_flags_come_from_birth_date_on_edit() {
        let patient: Patient = serde_json::from_value(serde_json::json!({
            "id": "p9",
            "name": "Lia Souza",
            "birthDate": "2025-06-01",
            "sex": "F",
            "isElderly": true,
            "address": {"street": "Av. Central"}
        }))
        .unwrap();

        let mut wizard = RegistrationWizard::editing(&patient, calculator());
        assert_eq!(wizard.patient_id(), Some("p9"));
        let payload = loop {
            if let Advance::Submit(payload) = wizard.advance().unwrap() {
                break payload;
            }
        };
        assert!(payload.flags.is_child);
        assert!(!payload.flags.is_elderly);
    }

    #[test]
    fn test_pregnancy_requires_female() {
        let mut wizard = RegistrationWizard::new(calculator());
        filled(&mut wizard);
        wizard.draft_mut().is_pregnant = true;
        wizard.advance().unwrap();
        wizard.advance().unwrap();
        assert!(wizard.advance().is_err());
        assert_eq!(wizard.step(), Step::Clinical);
    }
}

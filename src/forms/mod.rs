pub mod consultation;
pub mod registration;
pub mod validators;

pub use consultation::{ChronicForm, ExamForm, HomeVisitForm, VaccineForm};
pub use registration::{Advance, RegistrationDraft, RegistrationWizard, Step};

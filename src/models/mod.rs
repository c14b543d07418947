pub mod care;
pub mod indicator;
pub mod patient;
pub mod user;

use serde::{Deserialize, Serialize};

pub use care::{
    AnthropometryAction, Appointment, AppointmentStatus, BloodPressureAction, ChronicConsultation,
    ChronicProgram, Exam, HomeVisit, NewAppointment, NewExam, NewHomeVisit, NewVaccineRecord,
    VaccineRecord, Vitals,
};
pub use indicator::{Criterion, DashboardSummary, Indicator, IndicatorStatus, Program, StatusTally};
pub use patient::{
    Address, EligibilityFlags, EligibilityGroup, Patient, PatientPayload, PatientQuery,
    PatientStatusFilter, Sex, TimelineEntry,
};
pub use user::{
    Credentials, LoginResponse, MicroArea, Notification, Role, UnreadCount, User, UserPayload,
};

/// Paged list envelope used by every list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default)]
    pub limit: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> Paginated<T> {
    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        (self.total.div_ceil(self.limit as u64)).max(1) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_pages() {
        let page: Paginated<u8> = Paginated { data: vec![], total: 41, page: 1, limit: 20 };
        assert_eq!(page.total_pages(), 3);

        let page: Paginated<u8> = Paginated { data: vec![], total: 0, page: 1, limit: 20 };
        assert_eq!(page.total_pages(), 1);
    }
}

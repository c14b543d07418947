use std::fmt;

/// Named group of cached reads. Invalidation works at this level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Bucket {
    CurrentUser,
    Dashboard,
    PatientList,
    Patient(String),
    PatientTimeline(String),
    PatientVaccines(String),
    PatientExams(String),
    Appointments,
    HomeVisits,
    Indicators,
    UserList,
    MicroAreas,
    Notifications,
    UnreadCount,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::CurrentUser => write!(f, "current-user"),
            Bucket::Dashboard => write!(f, "dashboard"),
            Bucket::PatientList => write!(f, "patients"),
            Bucket::Patient(id) => write!(f, "patient/{}", id),
            Bucket::PatientTimeline(id) => write!(f, "patient/{}/timeline", id),
            Bucket::PatientVaccines(id) => write!(f, "patient/{}/vaccines", id),
            Bucket::PatientExams(id) => write!(f, "patient/{}/exams", id),
            Bucket::Appointments => write!(f, "appointments"),
            Bucket::HomeVisits => write!(f, "home-visits"),
            Bucket::Indicators => write!(f, "indicators"),
            Bucket::UserList => write!(f, "users"),
            Bucket::MicroAreas => write!(f, "micro-areas"),
            Bucket::Notifications => write!(f, "notifications"),
            Bucket::UnreadCount => write!(f, "notifications/unread-count"),
        }
    }
}

/// A single cached read: a bucket plus the parameters that shaped the request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueryKey {
    pub bucket: Bucket,
    pub params: Option<String>,
}

impl QueryKey {
    pub fn new(bucket: Bucket) -> Self {
        Self { bucket, params: None }
    }

    pub fn with_params(bucket: Bucket, params: impl Into<String>) -> Self {
        Self { bucket, params: Some(params.into()) }
    }
}

impl From<Bucket> for QueryKey {
    fn from(bucket: Bucket) -> Self {
        QueryKey::new(bucket)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Some(params) => write!(f, "{}?{}", self.bucket, params),
            None => write!(f, "{}", self.bucket),
        }
    }
}

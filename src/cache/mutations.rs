use std::future::Future;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    cache::{keys::Bucket, store::QueryCache},
    error::Result,
    toast::Toasts,
};

/// Every write the client can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    CreatePatient,
    UpdatePatient(String),
    InactivatePatient(String),
    CreateAppointment(String),
    UpdateAppointmentStatus(String),
    CreateHomeVisit(String),
    ChronicConsultation(String),
    RecordVaccine(String),
    RecordExam(String),
    CreateUser,
    UpdateUser,
    MarkNotificationRead,
    MarkAllNotificationsRead,
}

impl Mutation {
    /// Buckets that must be refetched after this mutation succeeds.
    pub fn invalidates(&self) -> Vec<Bucket> {
        use Bucket as B;

        match self {
            Mutation::CreatePatient => vec![B::PatientList, B::Dashboard],
            Mutation::UpdatePatient(p) => vec![
                B::Patient(p.clone()),
                B::PatientList,
                B::PatientTimeline(p.clone()),
            ],
            Mutation::InactivatePatient(p) => {
                vec![B::Patient(p.clone()), B::PatientList, B::Dashboard]
            }
            Mutation::CreateAppointment(p) => vec![
                B::Patient(p.clone()),
                B::PatientTimeline(p.clone()),
                B::Appointments,
            ],
            Mutation::UpdateAppointmentStatus(p) => {
                vec![B::Appointments, B::PatientTimeline(p.clone())]
            }
            Mutation::CreateHomeVisit(p) => vec![
                B::Patient(p.clone()),
                B::PatientTimeline(p.clone()),
                B::HomeVisits,
            ],
            Mutation::ChronicConsultation(p) => vec![
                B::Patient(p.clone()),
                B::PatientTimeline(p.clone()),
                B::Indicators,
            ],
            Mutation::RecordVaccine(p) => vec![
                B::PatientVaccines(p.clone()),
                B::PatientTimeline(p.clone()),
                B::Indicators,
            ],
            Mutation::RecordExam(p) => {
                vec![B::PatientExams(p.clone()), B::PatientTimeline(p.clone())]
            }
            Mutation::CreateUser | Mutation::UpdateUser => vec![B::UserList],
            Mutation::MarkNotificationRead | Mutation::MarkAllNotificationsRead => {
                vec![B::Notifications, B::UnreadCount]
            }
        }
    }
}

/// Runs writes and applies the invalidation table on success.
#[derive(Clone)]
pub struct MutationCoordinator {
    cache: QueryCache,
    toasts: Arc<Toasts>,
}

impl MutationCoordinator {
    pub fn new(cache: QueryCache, toasts: Arc<Toasts>) -> Self {
        Self { cache, toasts }
    }

    /// Await `operation`; invalidate only if it succeeded.
    pub async fn run<T, Fut>(&self, mutation: Mutation, operation: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match operation.await {
            Ok(value) => {
                let buckets = mutation.invalidates();
                let touched = self.cache.invalidate(&buckets);
                info!(
                    "{:?} succeeded, {} bucket(s) invalidated ({} cached key(s))",
                    mutation,
                    buckets.len(),
                    touched.len()
                );
                Ok(value)
            }
            Err(e) => {
                warn!("{:?} failed: {}", mutation, e);
                Err(e)
            }
        }
    }

    /// Like [`run`](Self::run), also surfacing the outcome as a toast.
    pub async fn run_with_feedback<T, Fut>(
        &self,
        mutation: Mutation,
        success_message: &str,
        operation: Fut,
    ) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        let result = self.run(mutation, operation).await;
        match &result {
            Ok(_) => self.toasts.success(success_message),
            // 403 already raised its own toast in the request layer
            Err(crate::error::AppError::Forbidden(_)) => {}
            Err(e) => self.toasts.error(e.user_message()),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cache::keys::QueryKey, error::AppError, toast::ToastLevel};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn coordinator() -> (MutationCoordinator, QueryCache, Arc<Toasts>) {
        let cache = QueryCache::new();
        let toasts = Arc::new(Toasts::new());
        (MutationCoordinator::new(cache.clone(), toasts.clone()), cache, toasts)
    }

    #[test]
    fn test_appointment_invalidates_patient_and_timeline() {
        let buckets = Mutation::CreateAppointment("p1".to_string()).invalidates();
        assert!(buckets.contains(&Bucket::Patient("p1".to_string())));
        assert!(buckets.contains(&Bucket::PatientTimeline("p1".to_string())));
        assert_eq!(Mutation::CreateUser.invalidates(), vec![Bucket::UserList]);
    }

    #[tokio::test]
    async fn test_new_appointment_triggers_refetch_of_patient_views() {
        let (coordinator, cache, _) = coordinator();
        let fetches = AtomicUsize::new(0);
        let patient = QueryKey::new(Bucket::Patient("p1".to_string()));
        let timeline = QueryKey::new(Bucket::PatientTimeline("p1".to_string()));
        let other = QueryKey::new(Bucket::Patient("p2".to_string()));

        for key in [&patient, &timeline, &other] {
            cache
                .fetch(key.clone(), || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>(())
                })
                .await
                .unwrap();
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 3);

        coordinator
            .run(Mutation::CreateAppointment("p1".to_string()), async { Ok(()) })
            .await
            .unwrap();

        assert!(cache.is_stale(&patient));
        assert!(cache.is_stale(&timeline));
        assert!(!cache.is_stale(&other));

        for key in [&patient, &timeline, &other] {
            cache
                .fetch(key.clone(), || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, AppError>(())
                })
                .await
                .unwrap();
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_failed_mutation_invalidates_nothing() {
        let (coordinator, cache, toasts) = coordinator();
        let users = QueryKey::new(Bucket::UserList);
        cache.fetch(users.clone(), || async { Ok::<_, AppError>(0u8) }).await.unwrap();

        let result: Result<()> = coordinator
            .run_with_feedback(Mutation::CreateUser, "Usuário criado", async {
                Err(AppError::Validation("email: already taken".to_string()))
            })
            .await;

        assert!(result.is_err());
        assert!(!cache.is_stale(&users));
        let shown = toasts.drain();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].level, ToastLevel::Error);
        assert_eq!(shown[0].message, "email: already taken");
    }

    #[tokio::test]
    async fn test_forbidden_mutation_adds_no_second_toast() {
        let (coordinator, _, toasts) = coordinator();
        let _ = coordinator
            .run_with_feedback(Mutation::UpdateUser, "ok", async {
                Err::<(), _>(AppError::Forbidden("no".to_string()))
            })
            .await;
        assert!(toasts.is_empty());
    }
}

//! Client behaviour against a stub backend on an ephemeral port.

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use chrono::NaiveDate;
use ubs360::{
    eligibility::EligibilityCalculator,
    forms::{Advance, HomeVisitForm, RegistrationWizard, VaccineForm},
    models::{Address, EligibilityFlags, NewAppointment, PatientPayload, Sex},
    storage::{KeyValueStore, MemoryStore, AUTH_STORAGE_KEY},
    toast::ToastLevel,
    AppContext, AppError, Config,
};

const TOKEN: &str = "tok-1";

#[derive(Default)]
struct Stub {
    requests: Mutex<Vec<Recorded>>,
}

#[derive(Clone, Debug)]
struct Recorded {
    method: Method,
    path: String,
    authorization: Option<String>,
    body: Option<Value>,
}

impl Stub {
    fn record(&self, method: &Method, uri: &Uri, headers: &HeaderMap, body: Option<Value>) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        self.requests.lock().unwrap().push(Recorded {
            method: method.clone(),
            path: uri.path().to_string(),
            authorization,
            body,
        });
    }

    fn hits(&self, path: &str) -> Vec<Recorded> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.path == path)
            .cloned()
            .collect()
    }

    fn hits_with(&self, method: Method, path: &str) -> usize {
        self.hits(path).iter().filter(|r| r.method == method).count()
    }
}

fn user_json() -> Value {
    json!({
        "id": "u1",
        "name": "Joana Lima",
        "email": "joana@ubs.gov.br",
        "role": "NURSE"
    })
}

async fn login(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record(&method, &uri, &headers, Some(body.clone()));
    if body["password"] == "wrong" {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "Credenciais inválidas"})))
            .into_response();
    }
    Json(json!({"user": user_json(), "token": TOKEN})).into_response()
}

async fn me(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    stub.record(&method, &uri, &headers, None);
    let expected = format!("Bearer {}", TOKEN);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Json(user_json()).into_response(),
        _ => StatusCode::UNAUTHORIZED.into_response(),
    }
}

async fn expired(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    stub.record(&method, &uri, &headers, None);
    (StatusCode::UNAUTHORIZED, Json(json!({"message": "Token expirado"}))).into_response()
}

async fn forbidden(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    stub.record(&method, &uri, &headers, None);
    (
        StatusCode::FORBIDDEN,
        Json(json!({"error": {"code": "FORBIDDEN", "message": "Acesso negado"}})),
    )
        .into_response()
}

async fn reject_patient(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record(&method, &uri, &headers, Some(body));
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": {
                "code": "VALIDATION_ERROR",
                "message": "Dados inválidos",
                "details": [{"field": "cpf", "message": "invalid"}]
            }
        })),
    )
        .into_response()
}

async fn list_appointments(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, None);
    Json(json!({"data": [], "total": 0, "page": 1, "limit": 20}))
}

async fn create_appointment(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, Some(body.clone()));
    Json(json!({
        "id": "a1",
        "patientId": body["patientId"],
        "scheduledAt": body["scheduledAt"],
        "type": body["type"],
        "status": "SCHEDULED"
    }))
}

async fn create_visit(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, Some(body.clone()));
    Json(json!({
        "id": "v1",
        "patientId": body["patientId"],
        "visitDate": body["visitDate"],
        "reason": body["reason"]
    }))
}

async fn shared_action(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, Some(body));
    Json(json!({"ok": true}))
}

async fn list_visits(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, None);
    Json(json!({"data": [], "total": 0, "page": 1, "limit": 20}))
}

async fn blood_pressure(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stub.record(&method, &uri, &headers, Some(body.clone()));
    if body["patientId"] == "p-fail" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "boom"}))).into_response();
    }
    Json(json!({"ok": true})).into_response()
}

fn patient_json(name: &str) -> Value {
    json!({
        "id": "p1",
        "name": name,
        "birthDate": "2025-01-10",
        "sex": "F",
        "address": {"street": "Rua A", "city": "Recife"}
    })
}

async fn get_patient(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, None);
    Json(patient_json("Ana Souza"))
}

async fn update_patient(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, Some(body.clone()));
    let name = body["name"].as_str().unwrap_or_default().to_string();
    Json(patient_json(&name))
}

async fn patient_vaccines(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, None);
    Json(json!([]))
}

async fn record_vaccine(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    stub.record(&method, &uri, &headers, Some(body.clone()));
    Json(json!({
        "id": "vac1",
        "patientId": body["patientId"],
        "vaccine": body["vaccine"],
        "dose": body["dose"],
        "appliedAt": body["appliedAt"],
        "status": "APPLIED"
    }))
}

struct Harness {
    ctx: AppContext,
    store: Arc<MemoryStore>,
    stub: Arc<Stub>,
}

async fn harness() -> Harness {
    let stub = Arc::new(Stub::default());
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/me", get(me))
        .route("/api/dashboard/summary", get(expired))
        .route("/api/users", get(forbidden))
        .route("/api/patients", post(reject_patient))
        .route("/api/appointments", get(list_appointments).post(create_appointment))
        .route("/api/patients/:id", get(get_patient).put(update_patient))
        .route("/api/patients/:id/vaccines", get(patient_vaccines))
        .route("/api/vaccines", post(record_vaccine))
        .route("/api/home-visits", get(list_visits).post(create_visit))
        .route("/api/shared-actions/anthropometry", post(shared_action))
        .route("/api/shared-actions/blood-pressure", post(blood_pressure))
        .with_state(stub.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let mut config = Config::default();
    config.api.base_url = format!("http://{}/api", addr);

    let store = Arc::new(MemoryStore::new());
    let ctx = AppContext::new(config, store.clone()).unwrap();
    Harness { ctx, store, stub }
}

#[tokio::test]
async fn test_login_persists_session_and_sends_bearer() {
    let h = harness().await;

    let session = h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();
    assert_eq!(session.token, TOKEN);
    assert!(h.store.get(AUTH_STORAGE_KEY).unwrap().is_some());

    let user = h.ctx.refresh_current_user().await.unwrap();
    assert_eq!(user.email, "joana@ubs.gov.br");

    let me = h.stub.hits("/api/auth/me");
    assert_eq!(me.len(), 1);
    assert_eq!(me[0].authorization.as_deref(), Some("Bearer tok-1"));

    // No token is sent before there is a session
    let login = h.stub.hits("/api/auth/login");
    assert_eq!(login[0].authorization, None);
}

#[tokio::test]
async fn test_bad_credentials_are_not_a_session_expiry() {
    let h = harness().await;

    let err = h.ctx.login("joana@ubs.gov.br", "wrong").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Credenciais inválidas"));
    assert!(h.ctx.current_session().is_none());
}

#[tokio::test]
async fn test_unauthorized_clears_persisted_session() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    let err = h.ctx.dashboard().await.unwrap_err();

    assert!(matches!(err, AppError::Unauthorized));
    assert_eq!(h.store.get(AUTH_STORAGE_KEY).unwrap(), None);
    assert!(h.ctx.current_user().is_none());
}

#[tokio::test]
async fn test_forbidden_raises_a_single_toast() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    for _ in 0..3 {
        let err = h.ctx.users().await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    let toasts = h.ctx.toasts.drain();
    assert_eq!(toasts.len(), 1);
    assert_eq!(toasts[0].level, ToastLevel::Warning);
    assert_eq!(toasts[0].message, "Acesso negado");
    // Still logged in
    assert!(h.ctx.current_session().is_some());
}

#[tokio::test]
async fn test_validation_details_reach_the_caller() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    let payload = PatientPayload {
        name: "Ana Souza".to_string(),
        social_name: None,
        cpf: Some("11111111111".to_string()),
        cns: None,
        birth_date: "1990-05-01".to_string(),
        sex: Sex::Female,
        mother_name: None,
        phone: None,
        address: Address {
            street: "Rua A".to_string(),
            ..Address::default()
        },
        micro_area_id: None,
        flags: EligibilityFlags::default(),
    };

    let err = h.ctx.register_patient(&payload).await.unwrap_err();
    match err {
        AppError::Validation(message) => assert!(message.contains("cpf: invalid")),
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_new_appointment_refreshes_appointment_list() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    h.ctx.appointments(Some("p1"), 1).await.unwrap();
    h.ctx.appointments(Some("p1"), 1).await.unwrap();
    assert_eq!(h.stub.hits("/api/appointments").len(), 1);

    let appointment = NewAppointment {
        patient_id: "p1".to_string(),
        professional_id: None,
        scheduled_at: "2026-10-20T13:00:00Z".parse().unwrap(),
        kind: "CONSULTA".to_string(),
        notes: None,
    };
    h.ctx.create_appointment(&appointment).await.unwrap();

    h.ctx.appointments(Some("p1"), 1).await.unwrap();
    // one list, one create, one refetch
    assert_eq!(h.stub.hits("/api/appointments").len(), 3);
}

#[tokio::test]
async fn test_home_visit_posts_vitals_as_shared_actions() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    let form = HomeVisitForm {
        patient_id: "p1".to_string(),
        date: "2026-10-10".to_string(),
        reason: "Acompanhamento".to_string(),
        weight: "70,5".to_string(),
        systolic: "120".to_string(),
        diastolic: "80".to_string(),
        ..HomeVisitForm::default()
    };
    h.ctx.create_home_visit(&form).await.unwrap();

    let visits = h.stub.hits("/api/home-visits");
    assert_eq!(visits.len(), 1);
    let visit_body = visits[0].body.clone().unwrap();
    assert!(visit_body.get("weight").is_none());

    let anthropometry = h.stub.hits("/api/shared-actions/anthropometry");
    assert_eq!(anthropometry.len(), 1);
    assert_eq!(anthropometry[0].body.as_ref().unwrap()["weight"], json!(70.5));

    let pressure = h.stub.hits("/api/shared-actions/blood-pressure");
    assert_eq!(pressure.len(), 1);
    assert_eq!(pressure[0].body.as_ref().unwrap()["systolic"], json!(120));
}

#[tokio::test]
async fn test_home_visit_without_vitals_posts_only_the_visit() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    let form = HomeVisitForm {
        patient_id: "p1".to_string(),
        date: "2026-10-10".to_string(),
        reason: "Busca ativa".to_string(),
        ..HomeVisitForm::default()
    };
    h.ctx.create_home_visit(&form).await.unwrap();

    assert_eq!(h.stub.hits("/api/home-visits").len(), 1);
    assert!(h.stub.hits("/api/shared-actions/anthropometry").is_empty());
    assert!(h.stub.hits("/api/shared-actions/blood-pressure").is_empty());
}

#[tokio::test]
async fn test_vitals_failure_still_commits_the_visit() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    h.ctx.home_visits(Some("p-fail")).await.unwrap();
    h.ctx.home_visits(Some("p-fail")).await.unwrap();
    assert_eq!(h.stub.hits_with(Method::GET, "/api/home-visits"), 1);
    h.ctx.toasts.drain();

    let form = HomeVisitForm {
        patient_id: "p-fail".to_string(),
        date: "2026-10-10".to_string(),
        reason: "Acompanhamento".to_string(),
        systolic: "130".to_string(),
        diastolic: "85".to_string(),
        ..HomeVisitForm::default()
    };
    let visit = h.ctx.create_home_visit(&form).await.unwrap();
    assert_eq!(visit.id, "v1");
    assert_eq!(h.stub.hits_with(Method::POST, "/api/home-visits"), 1);

    let toasts = h.ctx.toasts.drain();
    assert!(toasts.iter().any(|t| t.level == ToastLevel::Success));
    let warning = toasts
        .iter()
        .find(|t| t.level == ToastLevel::Warning)
        .expect("vitals failure should warn");
    assert!(warning.message.contains("sinais vitais"));

    // The visit list was invalidated, so the next read goes to the backend
    h.ctx.home_visits(Some("p-fail")).await.unwrap();
    assert_eq!(h.stub.hits_with(Method::GET, "/api/home-visits"), 2);
}

#[tokio::test]
async fn test_patient_edit_recomputes_age_flags_and_refetches() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    let patient = h.ctx.patient("p1").await.unwrap();
    h.ctx.patient("p1").await.unwrap();
    assert_eq!(h.stub.hits_with(Method::GET, "/api/patients/p1"), 1);

    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
    let mut wizard = RegistrationWizard::editing(&patient, EligibilityCalculator::new(today));
    wizard.draft_mut().name = "Ana Souza Lima".to_string();
    let payload = loop {
        if let Advance::Submit(payload) = wizard.advance().unwrap() {
            break payload;
        }
    };

    let updated = h.ctx.update_patient("p1", &payload).await.unwrap();
    assert_eq!(updated.name, "Ana Souza Lima");

    let puts: Vec<Recorded> = h
        .stub
        .hits("/api/patients/p1")
        .into_iter()
        .filter(|r| r.method == Method::PUT)
        .collect();
    assert_eq!(puts.len(), 1);
    let body = puts[0].body.clone().unwrap();
    assert_eq!(body["name"], "Ana Souza Lima");
    assert_eq!(body["isChild"], json!(true));
    assert_eq!(body["isElderly"], json!(false));

    h.ctx.patient("p1").await.unwrap();
    assert_eq!(h.stub.hits_with(Method::GET, "/api/patients/p1"), 2);
}

#[tokio::test]
async fn test_recorded_vaccine_refreshes_vaccination_card() {
    let h = harness().await;
    h.ctx.login("joana@ubs.gov.br", "secret").await.unwrap();

    h.ctx.vaccines("p1").await.unwrap();
    h.ctx.vaccines("p1").await.unwrap();
    assert_eq!(h.stub.hits("/api/patients/p1/vaccines").len(), 1);

    let form = VaccineForm {
        patient_id: "p1".to_string(),
        vaccine: "Pentavalente".to_string(),
        dose: "1ª dose".to_string(),
        applied_at: "2026-10-01".to_string(),
    };
    let record = h.ctx.record_vaccine(&form.to_payload().unwrap()).await.unwrap();
    assert_eq!(record.id, "vac1");
    assert_eq!(h.stub.hits("/api/vaccines")[0].body.as_ref().unwrap()["appliedAt"], "2026-10-01");

    h.ctx.vaccines("p1").await.unwrap();
    assert_eq!(h.stub.hits("/api/patients/p1/vaccines").len(), 2);
}

//! In-process stand-in for the tracker backend.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Json, Router,
};
use jobtrack_client::controller::Controller;
use jobtrack_client::services::api_client::ApiClient;
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;

#[derive(Default)]
pub struct BackendState {
    pub applications: Vec<JsonValue>,
    pub interviews: Vec<JsonValue>,
    pub profile: JsonValue,
    /// `METHOD /path?query` of every request received, in order.
    pub requests: Vec<String>,
    /// Fields of the last multipart form; file parts map to their file name.
    pub last_form: HashMap<String, String>,
    next_id: u64,
}

impl BackendState {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        self.next_id.to_string()
    }
}

pub type Shared = Arc<Mutex<BackendState>>;

type Reply = Result<Json<JsonValue>, (StatusCode, Json<JsonValue>)>;

fn detail(status: StatusCode, message: &str) -> (StatusCode, Json<JsonValue>) {
    (status, Json(json!({ "detail": message })))
}

pub struct FakeBackend {
    pub state: Shared,
    pub base_url: String,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(BackendState {
            profile: json!({}),
            ..Default::default()
        }));

        let app = Router::new()
            .route("/health", get(health))
            .route("/api/applications", get(list_applications).post(create_application))
            .route(
                "/api/applications/:id",
                put(update_application).delete(delete_application),
            )
            .route("/api/applications/:id/cv", get(download_cv))
            .route("/api/interviews", get(list_interviews).post(create_interview))
            .route(
                "/api/interviews/:id",
                put(update_interview).delete(delete_interview),
            )
            .route("/api/profile", get(get_profile).post(save_profile))
            .route("/api/profile/upload-cv", post(upload_profile_cv))
            .route("/api/ai/profile/fill-from-resume-ai", post(fill_from_resume))
            .route("/api/ai/:tool", post(ai_tool))
            .layer(middleware::from_fn_with_state(state.clone(), record))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            state,
            base_url: format!("http://{}", addr),
        }
    }

    pub fn controller(&self) -> Controller {
        let api = ApiClient::new(&self.base_url, Duration::from_secs(5)).expect("client");
        Controller::new(api)
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn clear_requests(&self) {
        self.state.lock().unwrap().requests.clear();
    }

    pub fn last_form(&self) -> HashMap<String, String> {
        self.state.lock().unwrap().last_form.clone()
    }

    pub fn seed_application(&self, title: &str, company: &str, date: &str, status: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.applications.push(json!({
            "id": id,
            "job_title": title,
            "company": company,
            "application_date": date,
            "status": status,
        }));
        id
    }

    pub fn seed_interview(&self, title: &str, start: &str, end: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.interviews.push(json!({
            "id": id,
            "interview_title": title,
            "start_datetime": start,
            "end_datetime": end,
            "interview_type": "Technical",
        }));
        id
    }

    pub fn seed_profile(&self, profile: JsonValue) {
        self.state.lock().unwrap().profile = profile;
    }

    /// Deletes a record behind the client's back.
    pub fn forget_application(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .applications
            .retain(|a| a["id"] != id);
    }
}

async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let line = format!(
        "{} {}",
        req.method(),
        req.uri().path_and_query().map(|p| p.as_str()).unwrap_or("/")
    );
    state.lock().unwrap().requests.push(line);
    next.run(req).await
}

async fn read_form(mut multipart: Multipart) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let _ = field.bytes().await;
                file_name
            }
            None => field.text().await.unwrap_or_default(),
        };
        fields.insert(name, value);
    }
    fields
}

async fn health() -> Json<JsonValue> {
    Json(json!({ "status": "ok", "message": "Application is running." }))
}

async fn list_applications(State(state): State<Shared>) -> Json<JsonValue> {
    Json(JsonValue::Array(state.lock().unwrap().applications.clone()))
}

fn application_from_form(id: &str, form: &HashMap<String, String>) -> JsonValue {
    json!({
        "id": id,
        "job_title": form.get("job_title"),
        "company": form.get("company"),
        "application_date": form.get("application_date"),
        "status": form.get("status"),
        "link": form.get("link"),
        "description": form.get("description"),
        "cover_letter": form.get("cover_letter"),
        "cv_file": form.get("cv_file"),
    })
}

async fn create_application(State(state): State<Shared>, multipart: Multipart) -> Reply {
    let form = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_form = form.clone();
    if form.get("company").map(String::as_str) == Some("Broken Corp") {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "detail": [
                    {"loc": ["body", "company"], "msg": "company is blacklisted", "type": "value_error"}
                ]
            })),
        ));
    }
    let id = state.next_id();
    let app = application_from_form(&id, &form);
    state.applications.push(app.clone());
    Ok(Json(app))
}

async fn update_application(
    State(state): State<Shared>,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Reply {
    let form = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_form = form.clone();
    let slot = state
        .applications
        .iter_mut()
        .find(|a| a["id"] == id.as_str())
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Application not found."))?;
    let mut updated = application_from_form(&id, &form);
    if updated["cv_file"].is_null() {
        updated["cv_file"] = slot["cv_file"].clone();
    }
    *slot = updated.clone();
    Ok(Json(updated))
}

async fn delete_application(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut state = state.lock().unwrap();
    let before = state.applications.len();
    state.applications.retain(|a| a["id"] != id.as_str());
    if state.applications.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Application not found."));
    }
    Ok(Json(json!({ "message": "Application deleted successfully." })))
}

async fn download_cv(
    State(state): State<Shared>,
    Path(id): Path<String>,
) -> Result<Vec<u8>, (StatusCode, Json<JsonValue>)> {
    let state = state.lock().unwrap();
    let has_cv = state
        .applications
        .iter()
        .any(|a| a["id"] == id.as_str() && !a["cv_file"].is_null());
    if has_cv {
        Ok(b"%PDF-1.4 fake".to_vec())
    } else {
        Err(detail(StatusCode::NOT_FOUND, "CV not found."))
    }
}

async fn list_interviews(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<JsonValue> {
    let state = state.lock().unwrap();
    let prefix = match (query.get("year"), query.get("month")) {
        (Some(year), Some(month)) => month
            .parse::<u32>()
            .ok()
            .map(|m| format!("{}-{:02}", year, m)),
        _ => None,
    };
    let items = state
        .interviews
        .iter()
        .filter(|i| match &prefix {
            Some(prefix) => i["start_datetime"]
                .as_str()
                .map(|s| s.starts_with(prefix.as_str()))
                .unwrap_or(false),
            None => true,
        })
        .cloned()
        .collect();
    Json(JsonValue::Array(items))
}

async fn create_interview(State(state): State<Shared>, Json(mut body): Json<JsonValue>) -> Reply {
    let mut state = state.lock().unwrap();
    let id = state.next_id();
    body["id"] = json!(id);
    state.interviews.push(body.clone());
    Ok(Json(body))
}

async fn update_interview(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(mut body): Json<JsonValue>,
) -> Reply {
    let mut state = state.lock().unwrap();
    let slot = state
        .interviews
        .iter_mut()
        .find(|i| i["id"] == id.as_str())
        .ok_or_else(|| detail(StatusCode::NOT_FOUND, "Interview not found."))?;
    body["id"] = json!(id);
    *slot = body.clone();
    Ok(Json(body))
}

async fn delete_interview(State(state): State<Shared>, Path(id): Path<String>) -> Reply {
    let mut state = state.lock().unwrap();
    let before = state.interviews.len();
    state.interviews.retain(|i| i["id"] != id.as_str());
    if state.interviews.len() == before {
        return Err(detail(StatusCode::NOT_FOUND, "Interview not found."));
    }
    Ok(Json(json!({ "message": "Interview deleted successfully." })))
}

async fn get_profile(State(state): State<Shared>) -> Json<JsonValue> {
    Json(state.lock().unwrap().profile.clone())
}

async fn save_profile(State(state): State<Shared>, Json(mut body): Json<JsonValue>) -> Reply {
    let mut state = state.lock().unwrap();
    body["id"] = json!("profile-1");
    state.profile = body.clone();
    Ok(Json(body))
}

async fn upload_profile_cv(State(state): State<Shared>, multipart: Multipart) -> Reply {
    let form = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    let file_name = form
        .get("cv_file")
        .cloned()
        .ok_or_else(|| detail(StatusCode::BAD_REQUEST, "No file uploaded."))?;
    state.last_form = form;
    state.profile["cv_profile_file"] = json!(file_name);
    Ok(Json(state.profile.clone()))
}

async fn ai_tool(State(state): State<Shared>, Path(tool): Path<String>, multipart: Multipart) -> Reply {
    let form = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_form = form.clone();
    if form.get("api_key").map(String::as_str) == Some("bad-key") {
        return Err(detail(StatusCode::UNAUTHORIZED, "Invalid API key."));
    }
    Ok(Json(json!({ "result": format!("{} answered", tool) })))
}

async fn fill_from_resume(State(state): State<Shared>, multipart: Multipart) -> Reply {
    let form = read_form(multipart).await;
    let mut state = state.lock().unwrap();
    state.last_form = form;
    state.profile = json!({
        "id": "profile-1",
        "full_name": "Resume Person",
        "skills": [{"name": "Rust", "level": "Advanced"}],
    });
    Ok(Json(state.profile.clone()))
}

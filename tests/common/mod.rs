//! In-process inventory backend for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::Serialize;
use serde_json::{json, Value};

use inventory_client::auth::FixedClock;
use inventory_client::config::ApiConfig;
use inventory_client::infrastructure::{ApiClient, InMemorySessionStore, SessionStore};
use inventory_client::interfaces::AppContext;

pub const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-qr";

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: i64,
    iat: i64,
}

/// HS256 token expiring at `exp`
pub fn mint(exp: DateTime<Utc>) -> String {
    let claims = Claims {
        sub: "tester".to_string(),
        exp: exp.timestamp(),
        iat: (exp - Duration::hours(1)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"integration-secret"),
    )
    .unwrap()
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub role: &'static str,
    pub must_change_password: bool,
}

#[derive(Default)]
struct Data {
    accounts: Vec<Account>,
    workplaces: Vec<Value>,
    next_id: i32,
    requests: Vec<Recorded>,
    token: String,
}

/// Mock backend state, shared with the axum handler
#[derive(Clone)]
pub struct Backend {
    data: Arc<Mutex<Data>>,
    reject_all: Arc<AtomicBool>,
    on_reject: Arc<Mutex<Option<(Arc<FixedClock>, Duration)>>>,
    pub addr: SocketAddr,
}

impl Backend {
    /// Start listening on an ephemeral port. Logins are answered with `token`.
    pub async fn start(token: String) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let backend = Self {
            data: Arc::new(Mutex::new(Data {
                next_id: 1,
                token,
                ..Data::default()
            })),
            reject_all: Arc::new(AtomicBool::new(false)),
            on_reject: Arc::new(Mutex::new(None)),
            addr,
        };

        let app = Router::new().fallback(handle).with_state(backend.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        backend
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/", self.addr)
    }

    pub fn add_account(&self, username: &str, password: &str, role: &'static str, must_change: bool) {
        let mut data = self.data.lock().unwrap();
        let id = data.accounts.len() as i32 + 1;
        data.accounts.push(Account {
            id,
            username: username.to_string(),
            password: password.to_string(),
            role,
            must_change_password: must_change,
        });
    }

    pub fn accounts(&self) -> Vec<Account> {
        self.data.lock().unwrap().accounts.clone()
    }

    /// Insert a raw workplace record as the backend would store it
    pub fn seed_raw(&self, record: Value) {
        self.data.lock().unwrap().workplaces.push(record);
    }

    /// Insert `count` well-formed records named `WS-<n>`
    pub fn seed_workplaces(&self, count: usize) {
        let mut data = self.data.lock().unwrap();
        for _ in 0..count {
            let id = data.next_id;
            data.next_id += 1;
            data.workplaces.push(workplace_json(id, &format!("WS-{id}"), "Room 1", "HP"));
        }
    }

    pub fn workplace_count(&self) -> usize {
        self.data.lock().unwrap().workplaces.len()
    }

    pub fn workplace(&self, name: &str) -> Option<Value> {
        self.data
            .lock()
            .unwrap()
            .workplaces
            .iter()
            .find(|w| w["name"] == name)
            .cloned()
    }

    pub fn set_token(&self, token: String) {
        self.data.lock().unwrap().token = token;
    }

    /// Answer every request except login with 401
    pub fn reject_all(&self, on: bool) {
        self.reject_all.store(on, Ordering::SeqCst);
    }

    /// Move `clock` forward by `by` whenever a request is rejected, so the
    /// token attached to it is expired by the time the client sees the 401
    pub fn advance_on_reject(&self, clock: Arc<FixedClock>, by: Duration) {
        *self.on_reject.lock().unwrap() = Some((clock, by));
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.data.lock().unwrap().requests.clone()
    }

    pub fn requests_to(&self, method: Method, prefix: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .collect()
    }
}

pub fn workplace_json(id: i32, name: &str, location: &str, pc: &str) -> Value {
    json!({
        "workplaceID": id,
        "name": name,
        "description": "",
        "location": location,
        "pc": pc,
        "monitor": "",
        "telephone": "",
        "createdAt": "2024-05-17T10:21:33.1234567",
        "createdBy": "admin",
        "qrcode": STANDARD.encode(PNG),
    })
}

/// Client over an in-memory store with a clock fixed at `now`
pub fn client(backend: &Backend, now: DateTime<Utc>) -> (Arc<ApiClient>, Arc<InMemorySessionStore>, Arc<FixedClock>) {
    let store = Arc::new(InMemorySessionStore::new());
    let clock = Arc::new(FixedClock::new(now));
    let config = ApiConfig {
        base_url: backend.base_url(),
        ..ApiConfig::default()
    };
    let api = ApiClient::with_clock(&config, store.clone() as Arc<dyn SessionStore>, clock.clone()).unwrap();
    (Arc::new(api), store, clock)
}

pub fn context(backend: &Backend, now: DateTime<Utc>) -> (AppContext, Arc<InMemorySessionStore>, Arc<FixedClock>) {
    let (api, store, clock) = client(backend, now);
    (AppContext::new(api, 10), store, clock)
}

async fn handle(State(backend): State<Backend>, req: Request) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let body = to_bytes(req.into_body(), usize::MAX).await.unwrap_or_default();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let mut data = backend.data.lock().unwrap();
    data.requests.push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        authorization,
    });

    if backend.reject_all.load(Ordering::SeqCst) && path != "/api/auth/login" {
        if let Some((clock, by)) = backend.on_reject.lock().unwrap().as_ref() {
            clock.advance(*by);
        }
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method, segments.as_slice()) {
        (Method::POST, ["api", "auth", "login"]) => login(&data, &body),
        (Method::POST, ["api", "auth", "change-initial-password"]) => {
            if body["newPassword"] != body["confirmPassword"] {
                return (StatusCode::BAD_REQUEST, "mismatch").into_response();
            }
            Json(json!({ "token": data.token, "role": "Admin", "success": true })).into_response()
        }
        (Method::POST, ["api", "auth", "register"]) => {
            let username = body["username"].as_str().unwrap_or_default().to_string();
            if data.accounts.iter().any(|a| a.username == username) {
                return (StatusCode::CONFLICT, "exists").into_response();
            }
            let id = data.accounts.len() as i32 + 1;
            data.accounts.push(Account {
                id,
                username,
                password: body["password"].as_str().unwrap_or_default().to_string(),
                role: match body["roleName"].as_str() {
                    Some("SAdmin") => "SAdmin",
                    Some("Admin") => "Admin",
                    _ => "User",
                },
                must_change_password: body["mustChangePassword"].as_bool().unwrap_or(false),
            });
            StatusCode::OK.into_response()
        }
        (Method::GET, ["api", "auth", "users"]) => {
            let mut users = vec![json!({ "userID": 0, "username": null, "roleName": null })];
            users.extend(data.accounts.iter().map(|a| {
                json!({ "userID": a.id, "username": a.username, "roleName": a.role })
            }));
            Json(Value::Array(users)).into_response()
        }
        (Method::DELETE, ["api", "auth", "users", id]) => {
            let id: i32 = id.parse().unwrap_or(-1);
            let before = data.accounts.len();
            data.accounts.retain(|a| a.id != id);
            if data.accounts.len() == before {
                StatusCode::NOT_FOUND.into_response()
            } else {
                StatusCode::OK.into_response()
            }
        }
        (Method::POST, ["api", "workplace"]) => {
            let name = body["Name"].as_str().unwrap_or_default().to_string();
            if data.workplaces.iter().any(|w| w["name"] == name.as_str()) {
                return (StatusCode::CONFLICT, "duplicate").into_response();
            }
            let id = data.next_id;
            data.next_id += 1;
            let record = workplace_json(
                id,
                &name,
                body["Location"].as_str().unwrap_or_default(),
                body["PC"].as_str().unwrap_or_default(),
            );
            data.workplaces.push(record.clone());
            (StatusCode::CREATED, Json(record)).into_response()
        }
        (Method::GET, ["api", "workplace"]) => {
            let params: HashMap<String, String> = query
                .as_deref()
                .unwrap_or_default()
                .split('&')
                .filter_map(|kv| kv.split_once('='))
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect();
            let page: usize = params.get("page").and_then(|v| v.parse().ok()).unwrap_or(1);
            let size: usize = params.get("pageSize").and_then(|v| v.parse().ok()).unwrap_or(10);
            let slice: Vec<Value> = data
                .workplaces
                .iter()
                .skip(page.saturating_sub(1) * size)
                .take(size)
                .cloned()
                .collect();
            Json(json!({ "total": data.workplaces.len(), "page": page, "data": slice })).into_response()
        }
        (Method::GET, ["api", "workplace", "getname", name]) => {
            match data.workplaces.iter().find(|w| w["name"] == *name) {
                Some(record) => Json(record.clone()).into_response(),
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        (Method::GET, ["api", "workplace", id, "qr"]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            if data.workplaces.iter().any(|w| w["workplaceID"] == id) {
                ([(header::CONTENT_TYPE, "image/png")], Body::from(PNG)).into_response()
            } else {
                StatusCode::NOT_FOUND.into_response()
            }
        }
        (Method::PUT, ["api", "workplace", id]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            match data.workplaces.iter_mut().find(|w| w["workplaceID"] == id) {
                Some(record) => {
                    record["name"] = body["Name"].clone();
                    record["description"] = body["Description"].clone();
                    record["location"] = body["Location"].clone();
                    record["pc"] = body["PC"].clone();
                    record["monitor"] = body["Monitor"].clone();
                    record["telephone"] = body["Telephone"].clone();
                    StatusCode::NO_CONTENT.into_response()
                }
                None => StatusCode::NOT_FOUND.into_response(),
            }
        }
        (Method::DELETE, ["api", "workplace", id]) => {
            let id: i64 = id.parse().unwrap_or(-1);
            let before = data.workplaces.len();
            data.workplaces.retain(|w| w["workplaceID"] != id);
            if data.workplaces.len() == before {
                StatusCode::NOT_FOUND.into_response()
            } else {
                StatusCode::NO_CONTENT.into_response()
            }
        }
        (Method::DELETE, ["api", "workplace", "name", name]) => {
            let before = data.workplaces.len();
            data.workplaces.retain(|w| w["name"] != *name);
            if data.workplaces.len() == before {
                StatusCode::NOT_FOUND.into_response()
            } else {
                StatusCode::OK.into_response()
            }
        }
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn login(data: &Data, body: &Value) -> Response {
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let Some(account) = data
        .accounts
        .iter()
        .find(|a| a.username == username && a.password == password)
    else {
        return (StatusCode::UNAUTHORIZED, "invalid credentials").into_response();
    };

    if account.must_change_password {
        return Json(json!({ "mustChangePassword": true, "success": true })).into_response();
    }
    Json(json!({ "token": data.token, "role": account.role, "success": true })).into_response()
}

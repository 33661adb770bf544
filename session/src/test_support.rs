//! Scripted HTTP client and fixtures shared by the store tests.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use async_trait::async_trait;
use futures::channel::oneshot;
use serde_json::json;

use crate::config::ApiConfig;
use crate::error::SessionError;
use crate::token::MemoryTokenStore;
use crate::transport::{ApiRequest, ApiResponse, Endpoint, HttpClient, RestApi};

pub const BASE: &str = "http://api.test";

type Reply = Result<ApiResponse, SessionError>;

#[derive(Default)]
struct Script {
    replies: HashMap<&'static str, VecDeque<Reply>>,
    gates: HashMap<&'static str, oneshot::Receiver<()>>,
    requests: Vec<ApiRequest>,
}

/// Replays queued responses per endpoint path and records every request.
///
/// Clones share the script. Unscripted requests fail as network errors.
#[derive(Clone, Default)]
pub struct ScriptedHttp {
    script: Rc<RefCell<Script>>,
}

impl ScriptedHttp {
    pub fn reply(&self, endpoint: Endpoint, status: u16, body: serde_json::Value) {
        self.push(endpoint, Ok(ApiResponse { status, body: body.to_string() }));
    }

    pub fn reply_raw(&self, endpoint: Endpoint, status: u16, body: &str) {
        self.push(endpoint, Ok(ApiResponse { status, body: body.to_owned() }));
    }

    pub fn fail(&self, endpoint: Endpoint) {
        self.push(endpoint, Err(SessionError::Network("connection refused".to_owned())));
    }

    /// Hold the next response for `endpoint` until the returned sender fires.
    pub fn gate(&self, endpoint: Endpoint) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().gates.insert(endpoint.path(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.script.borrow().requests.clone()
    }

    pub fn requests_to(&self, endpoint: Endpoint) -> Vec<ApiRequest> {
        let url = format!("{BASE}{}", endpoint.path());
        self.requests()
            .into_iter()
            .filter(|r| r.url == url && r.method == endpoint.method())
            .collect()
    }

    fn push(&self, endpoint: Endpoint, reply: Reply) {
        self.script
            .borrow_mut()
            .replies
            .entry(endpoint.path())
            .or_default()
            .push_back(reply);
    }
}

#[async_trait(?Send)]
impl HttpClient for ScriptedHttp {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, SessionError> {
        let path = request.url.strip_prefix(BASE).unwrap_or_default().to_owned();
        let gate = self.script.borrow_mut().gates.remove(path.as_str());
        self.script.borrow_mut().requests.push(request);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        let reply = self
            .script
            .borrow_mut()
            .replies
            .get_mut(path.as_str())
            .and_then(VecDeque::pop_front);
        reply.unwrap_or_else(|| Err(SessionError::Network(format!("no scripted reply for {path}"))))
    }
}

pub fn rest_api(http: &ScriptedHttp, tokens: &MemoryTokenStore) -> RestApi<ScriptedHttp, MemoryTokenStore> {
    RestApi::new(ApiConfig::from_override(Some(BASE)), http.clone(), tokens.clone())
}

pub fn user_json(id: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "firstname": "Ana",
        "lastname": "Lopez",
        "email": "ana@example.com",
        "role": "user",
        "status": "success",
        "isActive": true,
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn auth_ok(user_id: &str, token: &str) -> serde_json::Value {
    json!({
        "success": true,
        "message": "ok",
        "data": { "user": user_json(user_id), "token": token }
    })
}

pub fn error_body(message: &str) -> serde_json::Value {
    json!({ "success": false, "message": message })
}

pub fn profile_json(id: &str, birthday: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "user": "u1",
        "firstname": "Ana",
        "lastname": "Lopez",
        "idNumber": "X123",
        "gender": "female",
        "birthday": birthday,
        "status": "active",
        "legalGuardian": [],
        "socialMedia": { "twitter": "@ana" },
        "createdAt": "2024-01-01T00:00:00.000Z",
        "updatedAt": "2024-01-01T00:00:00.000Z"
    })
}

pub fn profile_ok(id: &str, birthday: &str) -> serde_json::Value {
    json!({ "success": true, "message": "ok", "data": { "profile": profile_json(id, birthday) } })
}

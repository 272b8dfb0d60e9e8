//! In-crate transport double for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use librus_http::{HttpError, HttpRequest, HttpResponse, HttpTransport, StatusCode};
use parking_lot::Mutex;

pub const LANDING_PAGE: &str =
    r#"<html><head><meta name="csrf-token" content="csrf-abc"></head><body></body></html>"#;

/// Replies to requests from a FIFO script and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<(StatusCode, String)>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, status: StatusCode, body: impl Into<String>) -> &Self {
        self.replies.lock().push_back((status, body.into()));
        self
    }

    pub fn ok_json(&self, body: &serde_json::Value) -> &Self {
        self.reply(StatusCode::OK, body.to_string())
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Path and query of every request after the first `skip`.
    pub fn paths_after(&self, skip: usize) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .skip(skip)
            .map(|r| match r.url.query() {
                Some(query) => format!("{}?{query}", r.url.path()),
                None => r.url.path().to_owned(),
            })
            .collect()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn perform(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = request.url.clone();
        self.requests.lock().push(request);
        let (status, body) = self
            .replies
            .lock()
            .pop_front()
            .ok_or_else(|| HttpError::Transport(format!("no scripted reply for {url}").into()))?;
        Ok(HttpResponse::new(url, status, body))
    }
}

/// Queue the four replies of a successful login handing out `token`.
pub fn script_login(transport: &ScriptedTransport, token: &str) {
    transport
        .reply(StatusCode::OK, LANDING_PAGE)
        .reply(StatusCode::OK, r#"{"redirect":"/konto-librus/redirect/dru"}"#)
        .ok_json(&serde_json::json!({
            "lastModification": 0,
            "accounts": [{
                "id": 1,
                "accountIdentifier": "acc-1",
                "group": "parent",
                "accessToken": token,
                "login": "1234567u",
                "studentName": "Jan Kowalski",
                "scopes": "",
                "state": "active"
            }]
        }))
        .ok_json(&serde_json::json!({
            "Me": {
                "Account": {
                    "Id": 1,
                    "UserId": 11,
                    "FirstName": "Ewa",
                    "LastName": "Kowalska",
                    "Email": "parent@example.com",
                    "IsActive": true,
                    "Login": "1234567u",
                    "IsPremium": false,
                    "IsPremiumDemo": false
                },
                "Refresh": 0
            }
        }));
}

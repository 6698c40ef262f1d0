//! Shared test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use beacon_skill::{
    HttpRequest, HttpResponse, HttpTransport, Skill, TransportError, UpstreamClient,
    UpstreamConfig,
};
use serde_json::{Value, json};

/// Transport that returns a fixed outcome and counts calls
pub struct FakeTransport {
    outcome: Result<HttpResponse, TransportError>,
    calls: AtomicUsize,
    last_body: Mutex<Option<Value>>,
}

impl FakeTransport {
    /// Respond with the given status and body
    pub fn respond(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            outcome: Ok(HttpResponse {
                status,
                reason: None,
                body: body.to_string(),
            }),
            calls: AtomicUsize::new(0),
            last_body: Mutex::new(None),
        })
    }

    /// Respond with a single completion choice
    pub fn answer(content: &str) -> Arc<Self> {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": content}}]});
        Self::respond(200, &body.to_string())
    }

    /// Fail without a response
    pub fn fail(error: TransportError) -> Arc<Self> {
        Arc::new(Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
            last_body: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User message content of the last request sent
    pub fn last_query(&self) -> Option<String> {
        let body = self.last_body.lock().unwrap();
        body.as_ref()
            .and_then(|b| b["messages"][0]["content"].as_str())
            .map(ToString::to_string)
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn post_json(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_body.lock().unwrap() = Some(request.body);
        self.outcome.clone()
    }
}

/// Skill with an API key and the given transport
pub fn skill_with(transport: Arc<FakeTransport>) -> Skill {
    let config = UpstreamConfig::default().with_api_key("pplx-test");
    Skill::new(UpstreamClient::with_transport(config, transport))
}

/// Skill with no API key configured
pub fn unconfigured_skill(transport: Arc<FakeTransport>) -> Skill {
    Skill::new(UpstreamClient::with_transport(
        UpstreamConfig::default(),
        transport,
    ))
}

pub fn launch_event() -> Value {
    json!({
        "version": "1.0",
        "session": {"new": true, "sessionId": "amzn1.echo-api.session.test"},
        "request": {
            "type": "LaunchRequest",
            "requestId": "amzn1.echo-api.request.test",
            "locale": "en-US"
        }
    })
}

/// Intent event with slots given as (name, value) pairs, in order
pub fn intent_event(name: &str, slots: &[(&str, Option<&str>)]) -> Value {
    let mut slot_map = serde_json::Map::new();
    for (slot_name, value) in slots {
        let mut slot = json!({"name": slot_name, "confirmationStatus": "NONE"});
        if let Some(value) = value {
            slot["value"] = json!(value);
        }
        slot_map.insert((*slot_name).to_string(), slot);
    }

    json!({
        "version": "1.0",
        "request": {
            "type": "IntentRequest",
            "requestId": "amzn1.echo-api.request.test",
            "intent": {
                "name": name,
                "confirmationStatus": "NONE",
                "slots": slot_map
            }
        }
    })
}

pub fn session_ended_event() -> Value {
    json!({
        "version": "1.0",
        "request": {"type": "SessionEndedRequest", "reason": "USER_INITIATED"}
    })
}

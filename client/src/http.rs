//! Blocking HTTP implementation of the [`Gateway`] trait.

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;

use crate::gateway::{
    ActionRequest, ActionResult, CombatRecord, Gateway, GatewayError, JoinReply, LogEvent,
    ServerInfo, StartReply,
};
use crate::presets::CharacterSheet;
use crate::snapshot::{GameSnapshot, MatchSnapshot};
use crate::wire;

/// Server unresponsiveness surfaces as a transport error, never a hang.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, GatewayError> {
        tracing::debug!(path, "GET");
        let request = self.authed(self.client.get(self.url(path)).query(query));
        let response = request
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        handle_response(response)
    }

    fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, GatewayError> {
        tracing::debug!(path, "POST");
        let request = self.authed(self.client.post(self.url(path)).json(body));
        let response = request
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        handle_response(response)
    }

    fn post_empty(&self, path: &str) -> Result<Value, GatewayError> {
        tracing::debug!(path, "POST");
        let request = self.authed(self.client.post(self.url(path)));
        let response = request
            .send()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        handle_response(response)
    }
}

fn handle_response(response: Response) -> Result<Value, GatewayError> {
    let status = response.status();
    tracing::debug!(status = %status, "response");
    if status.is_client_error() || status.is_server_error() {
        let code = status.as_u16();
        let message = match response.text() {
            Ok(body) => error_message(&body, code),
            Err(_) => format!("HTTP {code}"),
        };
        return Err(GatewayError::Api {
            status: code,
            message,
        });
    }
    response
        .json()
        .map_err(|e| GatewayError::Transport(e.to_string()))
}

/// Pull the most useful message out of an error body: FastAPI-style `detail`
/// (string or validation list), then `message`, then the raw body.
fn error_message(body: &str, code: u16) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return if body.is_empty() {
            format!("HTTP {code}")
        } else {
            body.to_string()
        };
    };
    if let Some(detail) = value.get("detail") {
        return match detail {
            Value::Array(items) => items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => item.to_string(),
                })
                .collect::<Vec<_>>()
                .join("; "),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
    }
    if let Some(message) = value.get("message").and_then(Value::as_str) {
        return message.to_string();
    }
    value.to_string()
}

impl Gateway for HttpGateway {
    fn ping(&self) -> Result<ServerInfo, GatewayError> {
        let value = self.get("/", &[])?;
        serde_json::from_value(value).map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn join_game(&self, sheet: &CharacterSheet) -> Result<JoinReply, GatewayError> {
        let value = self.post("/game/join", sheet)?;
        serde_json::from_value(value).map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn start_game(&self) -> Result<StartReply, GatewayError> {
        let value = self.post_empty("/game/start")?;
        Ok(wire::start_reply(&value))
    }

    fn query_match(&self) -> Result<MatchSnapshot, GatewayError> {
        let value = self.get("/game", &[])?;
        Ok(wire::match_snapshot(&value))
    }

    fn query_state(&self, character_id: &str) -> Result<GameSnapshot, GatewayError> {
        let value = self.get("/game/state", &[("character_id", character_id)])?;
        Ok(wire::game_snapshot(&value))
    }

    fn submit_action(&self, request: &ActionRequest) -> Result<ActionResult, GatewayError> {
        let value = self.post("/game/action", request)?;
        serde_json::from_value(value).map_err(|e| GatewayError::Transport(e.to_string()))
    }

    fn query_log(&self) -> Result<Vec<LogEvent>, GatewayError> {
        let value = self.get("/game/log", &[])?;
        let events = value
            .as_array()
            .map(|entries| entries.iter().map(wire::log_event).collect())
            .unwrap_or_default();
        Ok(events)
    }

    fn query_history(&self) -> Result<Vec<CombatRecord>, GatewayError> {
        let value = self.get("/game/history", &[])?;
        let records = value
            .as_array()
            .map(|entries| entries.iter().map(wire::combat_record).collect())
            .unwrap_or_default();
        Ok(records)
    }
}

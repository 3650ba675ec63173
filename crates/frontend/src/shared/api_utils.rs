//! HTTP helpers for talking to the studio API.
//!
//! Every helper attaches the bearer token from local storage, maps transport
//! and status failures to readable strings and ends the session on `401`.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::config;
use crate::system::auth::{context::end_session, storage};

/// Base URL for API requests, e.g. "http://localhost:3000"
pub fn api_base() -> String {
    config().api_base.clone()
}

/// Full API URL from a path starting with "/api/"
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

fn auth_header() -> Result<String, String> {
    storage::get_access_token()
        .map(|token| format!("Bearer {}", token))
        .ok_or_else(|| "Not signed in".to_string())
}

fn authed(builder: RequestBuilder) -> Result<RequestBuilder, String> {
    Ok(builder.header("Authorization", &auth_header()?))
}

/// Turn a non-2xx response into an error, keeping the server's message if it sent one
async fn check(response: Response, action: &str, method: &str, path: &str) -> Result<Response, String> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    if status == 401 {
        log::warn!("{} {} -> 401, ending session", method, path);
        end_session();
        return Err("Your session has expired. Please sign in again.".to_string());
    }
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body);
    log::error!("{} {} -> {} {}", method, path, status, body);
    Err(match message {
        Some(m) => format!("{} failed: {} ({})", action, status, m),
        None => format!("{} failed: {}", action, status),
    })
}

/// `{"error": "..."}` or `{"message": "..."}` bodies, or short plain text
fn server_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        return ["error", "message", "detail"]
            .iter()
            .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
            .map(String::from);
    }
    (body.len() <= 200).then(|| body.to_string())
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    response
        .json::<T>()
        .await
        .map_err(|e| format!("Failed to parse response: {}", e))
}

pub async fn get_json<T: DeserializeOwned>(path: &str, action: &str) -> Result<T, String> {
    let response = authed(Request::get(&api_url(path)))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    parse(check(response, action, "GET", path).await?).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    path: &str,
    body: &B,
    action: &str,
) -> Result<T, String> {
    let response = authed(Request::post(&api_url(path)))?
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    parse(check(response, action, "POST", path).await?).await
}

/// POST where the response body is ignored
pub async fn post_command<B: Serialize>(path: &str, body: &B, action: &str) -> Result<(), String> {
    let response = authed(Request::post(&api_url(path)))?
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check(response, action, "POST", path).await.map(|_| ())
}

pub async fn put_json<B: Serialize>(path: &str, body: &B, action: &str) -> Result<(), String> {
    let response = authed(Request::put(&api_url(path)))?
        .json(body)
        .map_err(|e| format!("Failed to serialize request: {}", e))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check(response, action, "PUT", path).await.map(|_| ())
}

pub async fn delete(path: &str, action: &str) -> Result<(), String> {
    let response = authed(Request::delete(&api_url(path)))?
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;
    check(response, action, "DELETE", path).await.map(|_| ())
}

/// Id of a freshly created record from `{"id": "..."}`
pub fn created_id(value: &serde_json::Value) -> Option<String> {
    value.get("id").and_then(|v| match v {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_server_messages() {
        assert_eq!(
            server_message(r#"{"error":"Date is fully booked"}"#),
            Some("Date is fully booked".to_string())
        );
        assert_eq!(
            server_message(r#"{"message":"Invalid token"}"#),
            Some("Invalid token".to_string())
        );
        assert_eq!(server_message(r#"{"code":42}"#), None);
        assert_eq!(server_message("  "), None);
        assert_eq!(server_message("Bad Gateway"), Some("Bad Gateway".to_string()));
        assert_eq!(server_message(&"x".repeat(500)), None);
    }

    #[test]
    fn reads_created_ids() {
        assert_eq!(
            created_id(&serde_json::json!({"id": "bk-9"})),
            Some("bk-9".to_string())
        );
        assert_eq!(created_id(&serde_json::json!({"id": 17})), Some("17".to_string()));
        assert_eq!(created_id(&serde_json::json!({})), None);
    }
}

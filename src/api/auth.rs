// src/api/auth.rs — Static-password access endpoint

use crate::api::{types::*, ApiState};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::Json;

pub const COOKIE_NAME: &str = "comingSoonAuthorized";

/// Settings for the access endpoint, resolved once at startup.
#[derive(Debug, Clone)]
pub struct GateSettings {
    pub password: Option<String>,
    pub cookie_max_age_secs: u64,
    pub secure_cookie: bool,
}

impl From<&crate::infra::config::GateConfig> for GateSettings {
    fn from(config: &crate::infra::config::GateConfig) -> Self {
        Self {
            password: config.effective_password(),
            cookie_max_age_secs: config.cookie_max_age_secs,
            secure_cookie: config.secure_cookie,
        }
    }
}

type GateError = (StatusCode, Json<MessageResponse>);

fn gate_error(status: StatusCode, message: &str) -> GateError {
    (
        status,
        Json(MessageResponse {
            message: message.into(),
        }),
    )
}

/// `Set-Cookie` value granting access.
pub fn access_cookie(settings: &GateSettings) -> String {
    let mut cookie = format!(
        "{COOKIE_NAME}=true; Path=/; Max-Age={}; HttpOnly; SameSite=Strict",
        settings.cookie_max_age_secs
    );
    if settings.secure_cookie {
        cookie.push_str("; Secure");
    }
    cookie
}

/// POST /api/coming-soon-auth — Exchange the shared password for an access cookie.
pub async fn coming_soon_auth(
    State(state): State<ApiState>,
    body: Result<Json<AccessBody>, JsonRejection>,
) -> Result<(HeaderMap, Json<serde_json::Value>), GateError> {
    let Ok(Json(body)) = body else {
        return Err(gate_error(StatusCode::BAD_REQUEST, "Invalid request."));
    };

    let Some(ref expected) = state.gate.password else {
        return Err(gate_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Access is currently unavailable. Please contact the site owner.",
        ));
    };

    if !constant_time_eq(body.password.as_bytes(), expected.as_bytes()) {
        tracing::debug!("Access attempt with wrong password");
        return Err(gate_error(
            StatusCode::UNAUTHORIZED,
            "Incorrect password. Please try again.",
        ));
    }

    let cookie = HeaderValue::from_str(&access_cookie(&state.gate)).map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        gate_error(StatusCode::INTERNAL_SERVER_ERROR, "Invalid request.")
    })?;
    let mut headers = HeaderMap::new();
    headers.insert(header::SET_COOKIE, cookie);

    Ok((headers, Json(serde_json::json!({ "success": true }))))
}

/// Constant-time byte comparison to prevent timing attacks on the password.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"stervy", b"stervy"));
        assert!(!constant_time_eq(b"stervy", b"stervY"));
        assert!(!constant_time_eq(b"stervy", b"sterv"));
        assert!(constant_time_eq(b"", b""));
    }

    #[test]
    fn test_access_cookie_attributes() {
        let mut settings = GateSettings {
            password: Some("x".into()),
            cookie_max_age_secs: 604_800,
            secure_cookie: false,
        };
        assert_eq!(
            access_cookie(&settings),
            "comingSoonAuthorized=true; Path=/; Max-Age=604800; HttpOnly; SameSite=Strict"
        );
        settings.secure_cookie = true;
        assert!(access_cookie(&settings).ends_with("; Secure"));
    }
}

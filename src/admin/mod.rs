//! Basic-auth-gated admin panel.

pub mod csp;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::warn;

pub struct AdminState {
    pub username: String,
    pub password: String,
    pub static_dir: String,
}

const UNAUTHORIZED_PAGE: &str = r#"<div style="text-align:center;padding:50px;">
    <h2>Restricted area</h2>
    <p>Authentication is required to access the admin panel</p>
    <a href="/inicio">Back to start</a>
</div>"#;

const MISSING_PANEL_PAGE: &str = r#"<div style="text-align:center;padding:50px;">
    <h2>Error: admin.html not found</h2>
    <p>The admin.html file does not exist in the static directory</p>
    <a href="/inicio">Back to start</a>
</div>"#;

/// HTTP Basic auth gate for the admin routes.
pub async fn basic_auth(
    State(state): State<Arc<AdminState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.strip_prefix("Basic "))
        .and_then(|encoded| STANDARD.decode(encoded).ok())
        .and_then(|decoded| String::from_utf8(decoded).ok())
        .map(|credentials| check_credentials(&credentials, &state.username, &state.password))
        .unwrap_or(false);

    if authorized {
        next.run(request).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            [(header::WWW_AUTHENTICATE, "Basic realm=\"Admin Panel\"")],
            Html(UNAUTHORIZED_PAGE),
        )
            .into_response()
    }
}

/// Constant-time comparison of `user:password` credentials.
fn check_credentials(presented: &str, username: &str, password: &str) -> bool {
    let Some((user, pass)) = presented.split_once(':') else {
        return false;
    };

    let user_ok = user.as_bytes().ct_eq(username.as_bytes());
    let pass_ok = pass.as_bytes().ct_eq(password.as_bytes());
    bool::from(user_ok & pass_ok)
}

/// Serve admin.html from the static directory with a fresh CSP nonce
/// stamped onto its inline script and style tags.
pub async fn admin_panel(State(state): State<Arc<AdminState>>) -> Response {
    let path = Path::new(&state.static_dir).join("admin.html");

    let html = match tokio::fs::read_to_string(&path).await {
        Ok(html) => html,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "admin panel asset missing");
            return (StatusCode::NOT_FOUND, Html(MISSING_PANEL_PAGE)).into_response();
        }
    };

    let nonce = csp::generate_nonce();
    let html = csp::annotate_inline_tags(&html, &nonce);

    (
        [(
            header::CONTENT_SECURITY_POLICY,
            csp::csp_header_value(&nonce),
        )],
        Html(html),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_credentials_accepts_exact_match() {
        assert!(check_credentials("admin:s3cret", "admin", "s3cret"));
    }

    #[test]
    fn test_check_credentials_rejects_wrong_or_malformed() {
        assert!(!check_credentials("admin:wrong", "admin", "s3cret"));
        assert!(!check_credentials("other:s3cret", "admin", "s3cret"));
        assert!(!check_credentials("no-colon", "admin", "s3cret"));
        assert!(!check_credentials("", "admin", "s3cret"));
    }

    #[test]
    fn test_check_credentials_password_may_contain_colon() {
        assert!(check_credentials("admin:pa:ss", "admin", "pa:ss"));
    }
}

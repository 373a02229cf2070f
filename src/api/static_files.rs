use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use mime_guess::from_path;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

pub struct StaticState {
    pub static_dir: String,
}

const NOT_FOUND_PAGE: &str = r#"<div style="text-align:center;padding:50px;">
    <h2>404 - Page not found</h2>
    <a href="/inicio">Back to start</a>
</div>"#;

/// Serve files from the static directory; everything unmatched is a 404.
///
/// `.js` is pinned to application/javascript regardless of what the mime
/// table says.
pub async fn serve_static(State(state): State<Arc<StaticState>>, uri: Uri) -> Response {
    let path = uri.path().trim_start_matches('/');

    let Some(file_path) = sanitize(Path::new(&state.static_dir), path) else {
        return not_found();
    };

    match tokio::fs::read(&file_path).await {
        Ok(content) => {
            let mime_type = if file_path.extension().is_some_and(|ext| ext == "js") {
                "application/javascript".to_string()
            } else {
                from_path(&file_path).first_or_octet_stream().to_string()
            };

            match Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, mime_type)
                .body(Body::from(content))
            {
                Ok(response) => response,
                Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
            }
        }
        Err(_) => not_found(),
    }
}

/// Resolve a request path inside the static dir, refusing traversal out.
fn sanitize(base: &Path, request_path: &str) -> Option<PathBuf> {
    if request_path.is_empty() {
        return None;
    }

    let mut resolved = base.to_path_buf();
    for component in Path::new(request_path).components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            _ => return None,
        }
    }
    Some(resolved)
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        NOT_FOUND_PAGE,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_allows_plain_paths() {
        let base = Path::new("public");
        assert_eq!(
            sanitize(base, "admin.html"),
            Some(PathBuf::from("public/admin.html"))
        );
        assert_eq!(
            sanitize(base, "js/app.js"),
            Some(PathBuf::from("public/js/app.js"))
        );
    }

    #[test]
    fn test_sanitize_rejects_traversal_and_empty() {
        let base = Path::new("public");
        assert_eq!(sanitize(base, "../secrets"), None);
        assert_eq!(sanitize(base, "js/../../etc/passwd"), None);
        assert_eq!(sanitize(base, ""), None);
    }
}

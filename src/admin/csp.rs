//! Per-request CSP nonces for inline script and style tags.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(script|style)\b([^>]*)>").expect("inline tag pattern"));

/// 128-bit random nonce, base64-encoded for the CSP header and tag attributes.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::rng().fill_bytes(&mut bytes);
    STANDARD.encode(bytes)
}

/// Content-Security-Policy authorizing exactly the inline tags carrying
/// `nonce`.
pub fn csp_header_value(nonce: &str) -> String {
    format!(
        "default-src 'self'; script-src 'self' 'nonce-{nonce}'; script-src-attr 'none'; \
         style-src 'self' 'nonce-{nonce}'; img-src 'self' data: https:; connect-src 'self'; \
         font-src 'self'; object-src 'none'; base-uri 'self'; frame-ancestors 'none'"
    )
}

/// Annotate inline `<script>` and `<style>` opening tags with the nonce.
/// Tags that already carry a nonce attribute are left alone.
pub fn annotate_inline_tags(html: &str, nonce: &str) -> String {
    INLINE_TAG
        .replace_all(html, |caps: &regex::Captures| {
            let tag = &caps[1];
            let attrs = &caps[2];
            if attrs.contains("nonce") {
                caps[0].to_string()
            } else {
                format!("<{tag} nonce=\"{nonce}\"{attrs}>")
            }
        })
        .into_owned()
}

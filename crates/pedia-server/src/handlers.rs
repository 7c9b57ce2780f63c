//! Serves files from the current assembly.
//!
//! URL paths map onto output paths the way a static file server would map
//! them onto the written site: `/` and `/hash-map/` serve `index.html`
//! files, `/hash-map` redirects to `/hash-map/` so relative links resolve.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri, header};
use axum::response::{IntoResponse, Redirect, Response};
use pedia_site::Assembly;
use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

use crate::live_reload::LIVE_RELOAD_SCRIPT;
use crate::state::AppState;

/// Characters escaped when a path goes back into a `Location` header.
const PATH: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// What a request path resolves to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Resolved {
    /// Output path of an existing file.
    File(String),
    /// Location to redirect to.
    Redirect(String),
    NotFound,
}

fn exists(assembly: &Assembly, path: &str) -> bool {
    assembly.get(path).is_some() || assembly.asset(path).is_some()
}

/// Resolve a decoded URL path against the assembly outputs and static files.
///
/// Redirect locations are percent-encoded again.
pub(crate) fn resolve(assembly: &Assembly, url_path: &str) -> Resolved {
    let rel = url_path.trim_start_matches('/');
    if rel.split('/').any(|segment| segment == "..") {
        return Resolved::NotFound;
    }

    if rel.is_empty() || rel.ends_with('/') {
        let index = format!("{rel}index.html");
        return if exists(assembly, &index) {
            Resolved::File(index)
        } else {
            Resolved::NotFound
        };
    }
    if exists(assembly, rel) {
        return Resolved::File(rel.to_owned());
    }
    if exists(assembly, &format!("{rel}/index.html")) {
        return Resolved::Redirect(format!("/{}/", utf8_percent_encode(rel, PATH)));
    }
    Resolved::NotFound
}

/// Insert the live reload client before `</body>`.
pub(crate) fn inject_live_reload(html: &str) -> String {
    match html.rfind("</body>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + LIVE_RELOAD_SCRIPT.len());
            out.push_str(&html[..pos]);
            out.push_str(LIVE_RELOAD_SCRIPT);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{html}{LIVE_RELOAD_SCRIPT}"),
    }
}

/// Fallback handler for every non-WebSocket request.
pub(crate) async fn serve_output(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let Ok(url_path) = percent_decode_str(uri.path()).decode_utf8() else {
        return not_found(&state, uri.path());
    };
    let assembly = state.site.current();
    match resolve(&assembly, &url_path) {
        Resolved::File(path) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            let Some(content) = assembly.get(&path) else {
                return match assembly.asset(&path) {
                    Some(bytes) => {
                        ([(header::CONTENT_TYPE, mime.to_string())], bytes.to_vec()).into_response()
                    }
                    None => not_found(&state, &url_path),
                };
            };
            let is_html = mime.subtype() == mime_guess::mime::HTML;
            let body = if is_html && state.live_reload_enabled() {
                inject_live_reload(content)
            } else {
                content.to_owned()
            };
            let content_type = if is_html || mime.type_() == mime_guess::mime::TEXT {
                format!("{mime}; charset=utf-8")
            } else {
                mime.to_string()
            };
            ([(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Resolved::Redirect(location) => Redirect::permanent(&location).into_response(),
        Resolved::NotFound => not_found(&state, &url_path),
    }
}

fn not_found(state: &AppState, path: &str) -> Response {
    tracing::debug!(path, "Not found");
    let page = "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>Not found</title></head>\n\
                <body>\n<h1>Not found</h1>\n<p><a href=\"/\">Back to the home page</a></p>\n</body>\n</html>\n";
    let body = if state.live_reload_enabled() {
        inject_live_reload(page)
    } else {
        page.to_owned()
    };
    (
        StatusCode::NOT_FOUND,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        body,
    )
        .into_response()
}

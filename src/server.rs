//! HTML form front end.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`  | `/` | Landing page |
//! | `GET`/`POST` | `/classify` | Trademark classification form |
//! | `GET`/`POST` | `/objectives` | Company objective form |
//! | `POST` | `/objectives/download` | Posted text as a plain-text attachment |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! Handlers never fail: pipeline errors are rendered into the page.

use axum::{
    extract::State,
    http::header,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::core::assistant::Assistant;
use crate::domain::model::SkippedLine;
use crate::utils::error::Result;

pub const EMPTY_OBJECTIVE_WARNING: &str = "Please enter an objective.";

#[derive(Clone)]
struct AppState {
    assistant: Arc<Assistant>,
}

pub fn router(assistant: Arc<Assistant>) -> Router {
    Router::new()
        .route("/", get(handle_index))
        .route("/classify", get(handle_classify_form).post(handle_classify))
        .route("/objectives", get(handle_objectives_form).post(handle_objectives))
        .route("/objectives/download", post(handle_download))
        .route("/health", get(handle_health))
        .with_state(AppState { assistant })
}

/// Binds `bind` and serves until the process is terminated.
pub async fn run_server(assistant: Arc<Assistant>, bind: &str) -> Result<()> {
    let listener = TcpListener::bind(bind).await?;
    serve(listener, assistant).await
}

pub async fn serve(listener: TcpListener, assistant: Arc<Assistant>) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Web forms available at http://{}", addr);
    }
    axum::serve(listener, router(assistant)).await?;
    Ok(())
}

// ============ Page rendering ============

const STYLE: &str = "body{font-family:sans-serif;max-width:48rem;margin:2rem auto;padding:0 1rem}\
textarea{width:100%;font:inherit}\
.result{white-space:pre-wrap;border:1px solid #ccc;padding:1rem;background:#fafafa}\
.warning{color:#8a6d3b;background:#fcf8e3;padding:.5rem 1rem}\
.notice{color:#555}";

fn page(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n\
         <nav><a href=\"/\">Home</a> · <a href=\"/classify\">Classify</a> · \
         <a href=\"/objectives\">Objectives</a></nav>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = encode_text(title),
        style = STYLE,
        body = body,
    ))
}

fn classify_form(objective: &str) -> String {
    format!(
        "<p>Enter an objective to classify it into a trademark class.</p>\n\
         <form method=\"post\" action=\"/classify\">\n\
         <label for=\"objective\">Enter Objective</label>\n\
         <textarea id=\"objective\" name=\"objective\" rows=\"7\">{}</textarea>\n\
         <button type=\"submit\">Classify</button>\n</form>",
        encode_text(objective)
    )
}

fn objectives_form(entries: &str) -> String {
    format!(
        "<p>Enter one NIC code per line as <code>code - description</code>.</p>\n\
         <form method=\"post\" action=\"/objectives\">\n\
         <label for=\"entries\">NIC codes</label>\n\
         <textarea id=\"entries\" name=\"entries\" rows=\"10\">{}</textarea>\n\
         <button type=\"submit\">Generate Objectives</button>\n</form>",
        encode_text(entries)
    )
}

fn result_block(heading: &str, text: &str) -> String {
    format!(
        "<h2>{}</h2>\n<div class=\"result\">{}</div>",
        encode_text(heading),
        encode_text(text)
    )
}

fn warning_block(text: &str) -> String {
    format!("<p class=\"warning\">{}</p>", encode_text(text))
}

fn skipped_notice(skipped: &[SkippedLine]) -> String {
    if skipped.is_empty() {
        return String::new();
    }

    let items: String = skipped
        .iter()
        .map(|s| {
            format!(
                "<li>Line {}: <code>{}</code> ({})</li>",
                s.line_number,
                encode_text(&s.text),
                s.reason
            )
        })
        .collect();
    format!(
        "<div class=\"notice\"><p>Skipped {} line(s) that could not be parsed:</p><ul>{}</ul></div>",
        skipped.len(),
        items
    )
}

fn download_form(content: &str, filename: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/objectives/download\">\n\
         <input type=\"hidden\" name=\"content\" value=\"{}\">\n\
         <button type=\"submit\">Download {}</button>\n</form>",
        encode_double_quoted_attribute(content),
        encode_text(filename)
    )
}

// ============ Handlers ============

async fn handle_index() -> Html<String> {
    page(
        "Objective Assistant",
        "<ul>\n<li><a href=\"/classify\">Trademark Classification Assistant</a></li>\n\
         <li><a href=\"/objectives\">Company Objective Generator</a></li>\n</ul>",
    )
}

#[derive(Debug, Deserialize)]
struct ClassifyForm {
    #[serde(default)]
    objective: String,
}

async fn handle_classify_form() -> Html<String> {
    page("Trademark Classification Assistant", &classify_form(""))
}

async fn handle_classify(
    State(state): State<AppState>,
    Form(form): Form<ClassifyForm>,
) -> Html<String> {
    let mut body = classify_form(&form.objective);

    if form.objective.is_empty() {
        body.push_str(&warning_block(EMPTY_OBJECTIVE_WARNING));
    } else {
        let result = state.assistant.classifier().respond(&form.objective).await;
        body.push_str(&result_block("Classification Result:", &result));
    }

    page("Trademark Classification Assistant", &body)
}

#[derive(Debug, Deserialize)]
struct ObjectivesForm {
    #[serde(default)]
    entries: String,
}

async fn handle_objectives_form() -> Html<String> {
    page("Company Objective Generator", &objectives_form(""))
}

async fn handle_objectives(
    State(state): State<AppState>,
    Form(form): Form<ObjectivesForm>,
) -> Html<String> {
    let writer = state.assistant.objectives();
    let mut body = objectives_form(&form.entries);

    match writer.run(&form.entries).await {
        Ok(outcome) => {
            body.push_str(&skipped_notice(&outcome.skipped));
            body.push_str(&result_block("Generated Objectives:", &outcome.text));
            body.push_str(&download_form(&outcome.text, writer.download_filename()));
        }
        Err(e) => {
            tracing::warn!("Objective generation failed ({:?}): {}", e.category(), e);
            body.push_str(&warning_block(&e.user_message()));
        }
    }

    page("Company Objective Generator", &body)
}

#[derive(Debug, Deserialize)]
struct DownloadForm {
    #[serde(default)]
    content: String,
}

async fn handle_download(
    State(state): State<AppState>,
    Form(form): Form<DownloadForm>,
) -> impl IntoResponse {
    let filename = state.assistant.objectives().download_filename();
    let disposition = format!("attachment; filename=\"{}\"", filename);

    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        form.content,
    )
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, warn};

use finder_common::model::AttachedFile;

use crate::controller::{PageView, SearchController};

const PAGE: &str = include_str!("assets/index.html");
const UNREADABLE_UPLOAD: &str = "Could not read the attached file";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchForm {
    query: String,
}

pub fn router(controller: Arc<SearchController>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/view", get(api_view))
        // Spreadsheets are buffered whole; uploads are not size-capped.
        .route(
            "/api/attachment",
            post(api_select)
                .delete(api_remove)
                .layer(DefaultBodyLimit::disable()),
        )
        .route("/api/search", post(api_search))
        .with_state(controller)
}

async fn index(State(controller): State<Arc<SearchController>>) -> Html<String> {
    Html(render_page(&controller.view().await))
}

async fn api_view(State(controller): State<Arc<SearchController>>) -> Json<PageView> {
    Json(controller.view().await)
}

/// A broken upload still answers with a `PageView`, so the page keeps the
/// previous attachment and shows the notice.
async fn api_select(
    State(controller): State<Arc<SearchController>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Json<PageView>) {
    let files = match multipart {
        Ok(multipart) => read_files(multipart).await,
        Err(e) => Err((e.status(), e.body_text())),
    };
    match files {
        Ok(files) => (StatusCode::OK, Json(controller.select(files).await)),
        Err((status, reason)) => {
            warn!(%status, %reason, "attachment upload rejected");
            let view = controller.view().await.with_notice(UNREADABLE_UPLOAD);
            (status, Json(view))
        }
    }
}

async fn read_files(mut multipart: Multipart) -> Result<Vec<AttachedFile>, (StatusCode, String)> {
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(rejected)? {
        if field.name() != Some("file") {
            continue;
        }
        // Browsers send an unnamed empty part when nothing was picked.
        let Some(name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string) else {
            continue;
        };
        let media_type = field.content_type().map(str::to_string);
        let content = field.bytes().await.map_err(rejected)?;
        files.push(AttachedFile::new(name, media_type.as_deref(), content));
    }
    Ok(files)
}

async fn api_remove(State(controller): State<Arc<SearchController>>) -> Json<PageView> {
    Json(controller.remove().await)
}

async fn api_search(
    State(controller): State<Arc<SearchController>>,
    Json(form): Json<SearchForm>,
) -> Json<PageView> {
    match controller.submit(&form.query).await {
        Ok(view) => Json(view),
        Err(e) => {
            info!(reason = %e, "search refused");
            Json(controller.view().await.with_notice(e.to_string()))
        }
    }
}

fn rejected(e: MultipartError) -> (StatusCode, String) {
    (e.status(), e.body_text())
}

fn render_page(view: &PageView) -> String {
    let preview_class = if view.preview.is_some() {
        "attachment-preview show"
    } else {
        "attachment-preview"
    };
    let loading_class = if view.loading { "loading" } else { "loading hidden" };

    fill(PAGE, |key| match key {
        "preview_class" => Some(preview_class),
        "preview" => Some(view.preview.as_deref().unwrap_or("")),
        "loading_class" => Some(loading_class),
        "results" => Some(view.results.as_str()),
        _ => None,
    })
}

/// Replaces `{{key}}` placeholders in one pass, so substituted text is never
/// scanned again. Unknown keys are left as they are.
fn fill<'a>(template: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let key = &after[..end];
                match lookup(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("{{");
                        out.push_str(key);
                        out.push_str("}}");
                    }
                }
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

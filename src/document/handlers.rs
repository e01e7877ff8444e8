use actix_files::NamedFile;
use actix_web::http::header::{
    self, ContentDisposition, DispositionParam, DispositionType,
};
use actix_web::web::{self, Form, Path, Query};
use actix_web::{HttpRequest, HttpResponse, Responder};
use log::{debug, error, info};
use serde::Deserialize;
use tempfile::TempDir;
use uuid::Uuid;

use crate::document::models::{GenerateError, Submission, SubmissionForm};
use crate::latex::compiler::compile_pdf;
use crate::latex::escape::latex_escape;
use crate::latex::template::render_document;
use crate::state::AppState;
use crate::ErrorResponse;

const FORM_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Generate PDF</title></head>
<body>
<form action="/generate" method="POST">
  <label for="name">Name:</label>
  <input type="text" id="name" name="name" required><br><br>
  <label for="email">Email:</label>
  <input type="email" id="email" name="email" required><br><br>
  <label for="message">Message:</label>
  <textarea id="message" name="message" rows="4" cols="50" required></textarea><br><br>
  <button type="submit">Generate PDF</button>
</form>
</body>
</html>
"#;

#[utoipa::path(
    tag = "Document Service",
    get,
    path = "/",
    responses(
        (status = 200, description = "HTML submission form", content_type = "text/html")
    )
)]
pub async fn show_form() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(FORM_PAGE)
}

#[utoipa::path(
    tag = "Document Service",
    post,
    path = "/generate",
    request_body(content = inline(SubmissionForm), content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Document generated, redirects to the preview page"),
        (status = 400, description = "Missing or malformed fields", body = ErrorResponse),
        (status = 500, description = "Compilation or storage failure", body = ErrorResponse)
    )
)]
pub async fn generate_document(
    form: Form<SubmissionForm>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing generate_document handler");

    let submission = match Submission::try_from(form.into_inner()) {
        Ok(submission) => submission,
        Err(e) => {
            error!("Submission rejected: {}", e);
            return HttpResponse::from(e);
        }
    };

    match run_generation(&submission, &data).await {
        Ok(id) => {
            info!("Document {} generated successfully", id);
            HttpResponse::SeeOther()
                .insert_header((header::LOCATION, format!("/preview?id={}", id)))
                .finish()
        }
        Err(e) => {
            error!("Document generation failed: {}", e);
            HttpResponse::from(e)
        }
    }
}

/// Runs one generation attempt end to end.
///
/// The scratch directory lives inside the configured work dir and is
/// removed on drop, whichever way this returns. The only file that can
/// outlive the attempt is the published artifact.
async fn run_generation(
    submission: &Submission,
    data: &AppState,
) -> Result<Uuid, GenerateError> {
    let id = Uuid::new_v4();

    let scratch = TempDir::with_prefix_in(format!("job-{}-", id), &data.config.work_dir)?;
    let tex_path = scratch.path().join(format!("{}.tex", id));

    let source = render_document(
        &latex_escape(&submission.name),
        &latex_escape(&submission.email),
        &latex_escape(&submission.message),
    );
    tokio::fs::write(&tex_path, source).await?;
    debug!("Wrote LaTeX source for document {}", id);

    let _permit = data.compile_permits.acquire().await.map_err(|_| {
        GenerateError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "compile queue closed",
        ))
    })?;

    let pdf_path = compile_pdf(
        &data.config.compiler,
        scratch.path(),
        &tex_path,
        data.config.compile_timeout,
    )
    .await?;

    data.store.publish(&pdf_path, &id)?;
    Ok(id)
}

#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub id: String,
}

#[utoipa::path(
    tag = "Document Service",
    get,
    path = "/preview",
    params(
        ("id" = String, Query, description = "Artifact identifier from the generate redirect")
    ),
    responses(
        (status = 200, description = "HTML page embedding the PDF with a download action", content_type = "text/html"),
        (status = 404, description = "Unknown artifact identifier", body = ErrorResponse)
    )
)]
pub async fn preview_document(
    params: Query<PreviewParams>,
    data: web::Data<AppState>,
) -> impl Responder {
    info!("Executing preview_document handler for id: {}", params.id);

    match resolve_artifact(&params.id, &data) {
        Some(id) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(preview_page(&id)),
        None => not_found_response(&params.id),
    }
}

#[utoipa::path(
    tag = "Document Service",
    get,
    path = "/artifact/{id}",
    params(
        ("id" = String, Path, description = "Artifact identifier")
    ),
    responses(
        (status = 200, description = "PDF bytes, inline disposition", content_type = "application/pdf"),
        (status = 404, description = "Unknown artifact identifier", body = ErrorResponse)
    )
)]
pub async fn serve_document(
    req: HttpRequest,
    id: Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let raw = id.into_inner();
    info!("Executing serve_document handler for id: {}", raw);

    match resolve_artifact(&raw, &data) {
        Some(id) => open_artifact(&req, &data, &id, DispositionType::Inline).await,
        None => not_found_response(&raw),
    }
}

#[utoipa::path(
    tag = "Document Service",
    post,
    path = "/artifact/{id}/download",
    params(
        ("id" = String, Path, description = "Artifact identifier")
    ),
    responses(
        (status = 200, description = "PDF bytes, attachment disposition", content_type = "application/pdf"),
        (status = 404, description = "Unknown artifact identifier", body = ErrorResponse)
    )
)]
pub async fn download_document(
    req: HttpRequest,
    id: Path<String>,
    data: web::Data<AppState>,
) -> HttpResponse {
    let raw = id.into_inner();
    info!("Executing download_document handler for id: {}", raw);

    match resolve_artifact(&raw, &data) {
        Some(id) => open_artifact(&req, &data, &id, DispositionType::Attachment).await,
        None => not_found_response(&raw),
    }
}

/// Parses a client-supplied identifier and checks that the artifact exists.
///
/// Anything that does not parse as a UUID is treated as unknown, so raw
/// client strings never form a filesystem path.
fn resolve_artifact(raw: &str, data: &AppState) -> Option<Uuid> {
    let id = Uuid::parse_str(raw).ok()?;
    data.store.contains(&id).then_some(id)
}

async fn open_artifact(
    req: &HttpRequest,
    data: &AppState,
    id: &Uuid,
    disposition: DispositionType,
) -> HttpResponse {
    let path = data.store.artifact_path(id);
    match NamedFile::open_async(&path).await {
        Ok(file) => {
            let content_disposition = ContentDisposition {
                disposition,
                parameters: vec![DispositionParam::Filename(format!("document-{}.pdf", id))],
            };
            file.set_content_disposition(content_disposition)
                .into_response(req)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Raced with an external eviction between the existence check
            // and the open.
            not_found_response(&id.to_string())
        }
        Err(e) => {
            error!("Failed to open artifact {}: {}", id, e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to read document"))
        }
    }
}

fn not_found_response(raw_id: &str) -> HttpResponse {
    error!("Artifact not found: {}", raw_id);
    HttpResponse::NotFound().json(ErrorResponse::not_found("Document not found"))
}

fn preview_page(id: &Uuid) -> String {
    format!(
        r#"<h1>PDF Preview</h1>
<iframe src="/artifact/{id}" width="100%" height="600px"></iframe><br><br>
<form action="/artifact/{id}/download" method="POST">
    <button type="submit">Download PDF</button>
</form>
"#
    )
}

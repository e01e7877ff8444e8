use actix_web::HttpResponse;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::latex::compiler::CompileError;
use crate::ErrorResponse;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
}

/// Raw form body as posted by the browser.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SubmissionForm {
    #[schema(example = "Alice")]
    pub name: String,
    #[schema(example = "alice@example.com")]
    pub email: String,
    #[schema(example = "Hello & welcome")]
    pub message: String,
}

/// A validated submission. Display-only data: none of these fields ever
/// becomes a path component.
#[derive(Debug, Clone)]
pub struct Submission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl TryFrom<SubmissionForm> for Submission {
    type Error = GenerateError;

    fn try_from(form: SubmissionForm) -> Result<Self, Self::Error> {
        let name = form.name.trim().to_string();
        let email = form.email.trim().to_string();
        let message = form.message.trim().to_string();

        if name.is_empty() {
            return Err(GenerateError::MissingField("name"));
        }
        if email.is_empty() {
            return Err(GenerateError::MissingField("email"));
        }
        if message.is_empty() {
            return Err(GenerateError::MissingField("message"));
        }
        if !EMAIL_RE.is_match(&email) {
            return Err(GenerateError::InvalidEmail);
        }

        Ok(Self {
            name,
            email,
            message,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("PDF compilation failed: {0}")]
    Compile(#[from] CompileError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GenerateError> for HttpResponse {
    fn from(error: GenerateError) -> Self {
        match error {
            GenerateError::MissingField(_) | GenerateError::InvalidEmail => {
                HttpResponse::BadRequest().json(ErrorResponse::bad_request(&format!("{}", error)))
            }
            // Details stay in the server log; the caller gets a generic body.
            GenerateError::Compile(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("PDF generation failed")),
            GenerateError::Io(_) => HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Internal storage failure")),
        }
    }
}

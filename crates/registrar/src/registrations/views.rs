use askama::Template;
use axum::response::Html;

use crate::error::AppError;

/// Registration form, optionally carrying an inline error from the previous attempt.
///
/// Submitted values are deliberately not echoed back into the inputs.
#[derive(Template)]
#[template(path = "index.html")]
pub struct RegistrationPage<'a> {
    pub error: Option<&'a str>,
}

impl<'a> RegistrationPage<'a> {
    pub fn blank() -> Self {
        Self { error: None }
    }

    pub fn with_error(message: &'a str) -> Self {
        Self {
            error: Some(message),
        }
    }
}

#[derive(Template)]
#[template(path = "success.html")]
pub struct SuccessPage {}

pub fn render<T: Template>(page: &T) -> Result<Html<String>, AppError> {
    Ok(Html(page.render()?))
}

use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use tracing::warn;

use super::domain::RegistrationForm;
use super::repository::RegistrationRepository;
use super::service::{RegistrationService, GENERIC_FAILURE_MESSAGE};
use super::views::{render, RegistrationPage, SuccessPage};
use crate::error::AppError;

pub const SUCCESS_PATH: &str = "/success";

/// Router exposing the form, its submission endpoint, and the confirmation page.
pub fn registration_router<R>(service: Arc<RegistrationService<R>>) -> Router
where
    R: RegistrationRepository + 'static,
{
    Router::new()
        .route("/", get(form_handler))
        .route("/register", post(register_handler::<R>))
        .route(SUCCESS_PATH, get(success_handler))
        .with_state(service)
}

pub(crate) async fn form_handler() -> Result<Html<String>, AppError> {
    render(&RegistrationPage::blank())
}

pub(crate) async fn success_handler() -> Result<Html<String>, AppError> {
    render(&SuccessPage {})
}

/// Persist the submission, answering with a redirect on success and the form plus a message
/// otherwise. Failures never change the status code of the re-rendered form.
pub(crate) async fn register_handler<R>(
    State(service): State<Arc<RegistrationService<R>>>,
    submission: Result<Form<RegistrationForm>, FormRejection>,
) -> Response
where
    R: RegistrationRepository + 'static,
{
    let form = match submission {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!(%rejection, "registration form could not be decoded");
            return form_with_error(GENERIC_FAILURE_MESSAGE);
        }
    };

    match service.register(form).await {
        Ok(_) => Redirect::to(SUCCESS_PATH).into_response(),
        Err(err) => form_with_error(err.user_message()),
    }
}

fn form_with_error(message: &str) -> Response {
    render(&RegistrationPage::with_error(message)).into_response()
}

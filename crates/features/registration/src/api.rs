//! JSON endpoints of the registration form.

use crate::error::{ErrorBody, RegistrationError};
use crate::plate::PlateValidator;
use crate::{Registration, Session, SubmitOutcome, messages};
use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;
use vreg_derive::{api_handler, api_model};
use vreg_kernel::domain::constants::REGISTRATION_TAG;
use vreg_kernel::domain::model::SubmissionState;
use vreg_kernel::server::ApiState;

/// Whether the form fields are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Open,
    Closed,
}

#[api_model]
/// Shown instead of the form while registration is closed
pub struct ClosedView {
    /// Operating windows, `HH:MM ~ HH:MM`
    pub windows: Vec<String>,
    /// Registration rules
    pub notice: String,
}

#[api_model]
/// Current rendering of a form session
pub struct FormView {
    pub status: FormStatus,
    /// `idle`, `processing` or `submitted`
    #[schema(value_type = String, example = "idle")]
    pub state: SubmissionState,
    /// Admin override active
    pub admin: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub closed: Option<ClosedView>,
    /// Persistent notice once the session has submitted
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notice: Option<String>,
}

#[api_model]
/// A freshly started session
pub struct SessionCreated {
    pub session_id: String,
    pub form: FormView,
}

#[api_model(rename_all = "snake_case")]
/// Form fields
pub struct SubmitForm {
    pub name: String,
    pub car_number: String,
}

/// What a submit call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SubmitStatus {
    Submitted,
    Ignored,
}

#[api_model]
/// Submit result
pub struct SubmitResponse {
    pub outcome: SubmitStatus,
    /// Confirmation or the reason the call was ignored
    pub message: String,
    pub form: FormView,
}

#[api_model]
/// Admin password prompt
pub struct AdminForm {
    #[serde(default)]
    pub password: String,
}

#[api_model]
/// Admin toggle result
pub struct AdminResponse {
    pub admin: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    pub form: FormView,
}

#[api_model(rename_all = "snake_case")]
/// Plate to check
pub struct PlateForm {
    pub car_number: String,
}

#[api_model]
/// Plate check result
pub struct PlateCheck {
    pub valid: bool,
    pub normalized_plate: String,
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub message: String,
}

impl FormView {
    #[must_use]
    pub fn of(session: &Session) -> Self {
        let open = session.is_form_open();
        let state = session.state();
        Self {
            status: if open { FormStatus::Open } else { FormStatus::Closed },
            state,
            admin: session.admin().is_active(),
            closed: (!open).then(|| {
                let closed = session.policy().closed_notice();
                ClosedView { windows: closed.windows, notice: closed.notice }
            }),
            notice: state.is_terminal().then(|| messages::ALREADY_SUBMITTED.to_owned()),
        }
    }
}

fn registration(state: &ApiState) -> Result<&Registration, RegistrationError> {
    state.try_get_slice::<Registration>().map_err(|e| RegistrationError::Internal {
        message: e.to_string().into(),
        context: None,
    })
}

/// Routes of the registration slice.
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(create_session))
        .routes(routes!(get_session))
        .routes(routes!(submit))
        .routes(routes!(toggle_admin))
        .routes(routes!(validate_plate))
}

#[api_handler(
    post,
    path = "/api/sessions",
    responses(
        (status = CREATED, description = "New session in its initial state", body = SessionCreated),
    ),
    tag = REGISTRATION_TAG,
)]
async fn create_session(
    State(state): State<ApiState>,
) -> Result<impl IntoResponse, RegistrationError> {
    let (session_id, session) = registration(&state)?.sessions.create();
    let form = FormView::of(&session);
    Ok((StatusCode::CREATED, Json(SessionCreated { session_id, form })))
}

#[api_handler(
    get,
    path = "/api/sessions/{id}",
    params(("id" = String, Path, description = "Session id")),
    responses(
        (status = OK, description = "Current form view", body = FormView),
        (status = NOT_FOUND, description = "Unknown or expired session", body = ErrorBody),
    ),
    tag = REGISTRATION_TAG,
)]
async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> Result<Json<FormView>, RegistrationError> {
    let session = registration(&state)?.sessions.get(&id)?;
    Ok(Json(FormView::of(&session)))
}

#[api_handler(
    post,
    path = "/api/sessions/{id}/submit",
    params(("id" = String, Path, description = "Session id")),
    request_body = SubmitForm,
    responses(
        (status = OK, description = "Registered, or ignored because busy or already submitted", body = SubmitResponse),
        (status = UNPROCESSABLE_ENTITY, description = "Missing fields or malformed plate", body = ErrorBody),
        (status = FORBIDDEN, description = "Outside the operating windows", body = ErrorBody),
        (status = CONFLICT, description = "Plate already registered", body = ErrorBody),
        (status = BAD_GATEWAY, description = "Remote endpoint failed", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown or expired session", body = ErrorBody),
    ),
    tag = REGISTRATION_TAG,
)]
async fn submit(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(form): Json<SubmitForm>,
) -> Result<Json<SubmitResponse>, RegistrationError> {
    let session = registration(&state)?.sessions.get(&id)?;

    let (outcome, message) = match session.submit(&form.name, &form.car_number).await? {
        SubmitOutcome::Submitted { confirmation } => (SubmitStatus::Submitted, confirmation),
        SubmitOutcome::Ignored { notice, .. } => (SubmitStatus::Ignored, notice.to_owned()),
    };

    Ok(Json(SubmitResponse { outcome, message, form: FormView::of(&session) }))
}

#[api_handler(
    post,
    path = "/api/sessions/{id}/admin",
    params(("id" = String, Path, description = "Session id")),
    request_body = AdminForm,
    responses(
        (status = OK, description = "Override toggled (or unchanged for an empty password)", body = AdminResponse),
        (status = UNAUTHORIZED, description = "Wrong password", body = ErrorBody),
        (status = NOT_FOUND, description = "Unknown or expired session", body = ErrorBody),
    ),
    tag = REGISTRATION_TAG,
)]
async fn toggle_admin(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(form): Json<AdminForm>,
) -> Result<Json<AdminResponse>, RegistrationError> {
    let session = registration(&state)?.sessions.get(&id)?;
    let toggle = session.admin().toggle(&form.password)?;

    Ok(Json(AdminResponse {
        admin: session.admin().is_active(),
        message: toggle.message().map(str::to_owned),
        form: FormView::of(&session),
    }))
}

#[api_handler(
    post,
    path = "/api/plates/validate",
    request_body = PlateForm,
    responses((status = OK, description = "Validation result", body = PlateCheck)),
    tag = REGISTRATION_TAG,
)]
async fn validate_plate(Json(form): Json<PlateForm>) -> Json<PlateCheck> {
    let result = PlateValidator::validate(&form.car_number);
    Json(PlateCheck {
        valid: result.valid,
        normalized_plate: result.normalized_plate,
        message: result.message,
    })
}

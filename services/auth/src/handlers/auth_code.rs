use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::authcode::{RequestCodeInput, RequestCodeUseCase};

#[derive(Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
}

pub async fn request_code(
    State(state): State<AppState>,
    Json(body): Json<RequestCodeRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = RequestCodeUseCase {
        students: state.student_repo(),
        auth_codes: state.auth_code_repo(),
        mailer: state.mailer.clone(),
        max_requests: state.config.rate_limit_max_requests,
        window_minutes: state.config.rate_limit_window_minutes,
        fail_closed: state.config.rate_limit_fail_closed,
    };
    usecase.execute(RequestCodeInput { email: body.email }).await?;
    Ok(StatusCode::CREATED)
}

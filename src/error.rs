//! # 에러 처리 모듈
//!
//! 애플리케이션에서 발생할 수 있는 모든 에러 타입을 정의합니다.
//!
//! 이 모듈의 핵심:
//! - `AppError` 열거형(enum): 모든 에러 종류를 하나의 타입으로 통합
//! - `AppError::code()`: HTTP 상태 코드와 별개인 **안정적인 에러 코드**.
//!   클라이언트는 전송 계층 상태가 아니라 이 코드로 분기합니다.
//! - `IntoResponse` 구현: 에러를 HTTP 응답으로 자동 변환

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션에서 발생할 수 있는 모든 에러 종류
///
/// 도메인 전제조건 위반(공백 중 아님, 이미 공백 중 등)은 타입이 있는 variant로,
/// 저장소 실패와 타임아웃은 내부 에러로 표현합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 사용자 식별 실패 (HTTP 401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 잘못된 요청 (HTTP 400): 형식이 틀린 날짜 문자열 등
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 이미 공백 중인데 시작 요청 (HTTP 409)
    #[error("Already in void")]
    AlreadyInVoid,

    /// 공백 중이 아닌데 종료/취소 요청 (HTTP 400)
    #[error("Not in void")]
    NotInVoid,

    /// 활동 라벨이 5개를 넘음 (HTTP 400)
    #[error("Activities must be 5 or fewer")]
    TooManyActivities,

    /// 등록되지 않은 활동 라벨 (HTTP 404)
    #[error("Activity not found: {0}")]
    ActivityNotFound(String),

    /// 같은 이름의 활동이 이미 있음 (HTTP 409)
    #[error("Activity already exists: {0}")]
    ActivityAlreadyExists(String),

    /// 활동 이름 길이 위반 (HTTP 400)
    #[error("Activity name must be 1-10 characters")]
    InvalidActivityName,

    /// 서버 내부 오류 (HTTP 500): 저장소 타임아웃 포함
    #[error("Internal error: {0}")]
    Internal(String),

    /// 데이터베이스 오류 (HTTP 500)
    /// #[from]: sqlx 함수에서 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// 클라이언트가 분기에 사용하는 안정적인 에러 코드
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::AlreadyInVoid => "ALREADY_IN_VOID",
            AppError::NotInVoid => "NOT_IN_VOID",
            AppError::TooManyActivities => "TOO_MANY_ACTIVITIES",
            AppError::ActivityNotFound(_) => "ACTIVITY_NOT_FOUND",
            AppError::ActivityAlreadyExists(_) => "ACTIVITY_ALREADY_EXISTS",
            AppError::InvalidActivityName => "INVALID_ACTIVITY_NAME",
            AppError::Internal(_) | AppError::Database(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_)
            | AppError::NotInVoid
            | AppError::TooManyActivities
            | AppError::InvalidActivityName => StatusCode::BAD_REQUEST,
            AppError::AlreadyInVoid | AppError::ActivityAlreadyExists(_) => StatusCode::CONFLICT,
            AppError::ActivityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    /// AppError를 HTTP 응답으로 변환합니다.
    ///
    /// 내부 에러(Database, Internal)는 실제 원인을 로그에만 기록하고,
    /// 클라이언트에는 일반적인 메시지만 반환합니다.
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code();

        let message = match self {
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {}", e);
                "An internal error occurred".to_string()
            }
            AppError::BadRequest(ref msg) | AppError::Unauthorized(ref msg) => msg.clone(),
            ref other => other.to_string(),
        };

        // 결과: { "error": { "code": "NOT_IN_VOID", "message": "Not in void" } }
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_stable_codes() {
        assert_eq!(AppError::AlreadyInVoid.code(), "ALREADY_IN_VOID");
        assert_eq!(AppError::AlreadyInVoid.status(), StatusCode::CONFLICT);
        assert_eq!(AppError::NotInVoid.code(), "NOT_IN_VOID");
        assert_eq!(AppError::NotInVoid.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::TooManyActivities.code(), "TOO_MANY_ACTIVITIES");
        assert_eq!(
            AppError::ActivityNotFound("read".into()).status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn storage_failures_surface_as_internal() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.code(), "INTERNAL_SERVER_ERROR");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

//! # 헬스체크(Health Check) 핸들러
//!
//! - `GET /api/v1/health` → `{ "status": "ok" }`
//!
//! 데이터베이스에 `SELECT 1`을 보내 연결까지 확인합니다.
//! 실패하면 500 `INTERNAL_SERVER_ERROR`입니다.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::error::AppError;

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state
        .store
        .run("ping database", async {
            sqlx::query("SELECT 1").execute(state.store.pool()).await?;
            Ok(())
        })
        .await?;

    Ok(Json(json!({
        "status": "ok"
    })))
}

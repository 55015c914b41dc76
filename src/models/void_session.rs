//! # 공백(void) 세션 모델 정의
//!
//! 사용자가 "공백" 상태(오프라인/수면)로 보낸 한 구간을 기록합니다.
//!
//! ## 세션 흐름
//! 1. `POST /void/start`: 사용자 상태만 공백 중으로 바뀌고, 세션은 아직 없음
//! 2. `POST /void/end`: 이때 `VoidSession`이 한 번 생성됨 (이후 불변)
//! 3. `POST /void/cancel`: 세션 없이 상태만 되돌림
//!
//! `target_day`는 **시작 시각** 기준으로 정해집니다.
//! 하루 경계를 넘어간 세션도 시작한 날에 속합니다.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 세션당 붙일 수 있는 활동 라벨의 최대 개수
pub const MAX_ACTIVITIES: usize = 5;

/// 완료된 공백 세션: DB의 `void_sessions` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VoidSession {
    /// 세션 고유 식별자 (UUIDv7)
    pub id: String,
    /// 세션 소유자
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    /// 항상 `started_at`보다 뒤
    pub ended_at: DateTime<Utc>,
    /// `ended_at - started_at` (초 단위, 소수점 버림)
    pub duration_sec: i64,
    /// 시작 시각이 속한 추적일 (`YYYY-MM-DD`)
    pub target_day: String,
    /// 활동 라벨 (최대 5개, 순서 유지). DB에는 JSON 텍스트로 저장됩니다.
    #[sqlx(json)]
    pub activities: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// `POST /void/start` 응답
#[derive(Debug, Serialize)]
pub struct VoidStartResponse {
    pub started_at: DateTime<Utc>,
    pub target_day: String,
}

/// `POST /void/end` 요청 본문
#[derive(Debug, Default, Deserialize)]
pub struct VoidEndRequest {
    /// 라벨이 없으면 빈 목록으로 처리
    #[serde(default)]
    pub activities: Vec<String>,
}

/// 세션 생성 결과: `POST /void/end`, `POST /void/test` 응답
#[derive(Debug, Serialize)]
pub struct VoidEndResponse {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_sec: i64,
    pub target_day: String,
    pub activities: Vec<String>,
}

impl From<VoidSession> for VoidEndResponse {
    fn from(session: VoidSession) -> Self {
        Self {
            session_id: session.id,
            started_at: session.started_at,
            ended_at: session.ended_at,
            duration_sec: session.duration_sec,
            target_day: session.target_day,
            activities: session.activities,
        }
    }
}

/// `POST /void/test` 요청 본문: 통계 테스트용 데이터를 직접 넣습니다.
#[derive(Debug, Deserialize)]
pub struct TestVoidRequest {
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    #[serde(default)]
    pub activities: Vec<String>,
}

/// `GET /void/history` 응답
#[derive(Debug, Serialize)]
pub struct VoidHistoryResponse {
    pub target_day: String,
    pub sessions: Vec<VoidSessionItem>,
    pub total_duration_sec: i64,
}

/// 기록 조회용 세션 요약
#[derive(Debug, Serialize)]
pub struct VoidSessionItem {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub duration_sec: i64,
    pub activities: Vec<String>,
}

impl From<VoidSession> for VoidSessionItem {
    fn from(session: VoidSession) -> Self {
        Self {
            session_id: session.id,
            started_at: session.started_at,
            ended_at: session.ended_at,
            duration_sec: session.duration_sec,
            activities: session.activities,
        }
    }
}

/// `?target_day=YYYY-MM-DD` 쿼리 파라미터. 없으면 현재 추적일을 사용합니다.
#[derive(Debug, Default, Deserialize)]
pub struct TargetDayQuery {
    pub target_day: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 활동 이름 최대 길이 (문자 수)
pub const MAX_ACTIVITY_NAME_CHARS: usize = 10;

/// 사용자가 등록한 활동 라벨. 세션 종료 시 이름으로 조회되어 사용 횟수가 올라갑니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Activity {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub usage_count: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateActivityRequest {
    pub name: String,
}

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub nickname: String,
    pub is_in_void: bool,
    pub current_void_started_at: Option<DateTime<Utc>>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    /// 진행 중인 공백의 시작 시각. 공백 중이 아니면 None.
    pub fn void_started_at(&self) -> Option<DateTime<Utc>> {
        if self.is_in_void {
            self.current_void_started_at
        } else {
            None
        }
    }
}

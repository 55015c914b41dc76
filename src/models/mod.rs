//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! - `activity`: 사용자별 활동 라벨
//! - `stat`: 버킷 캐시 행, 랭킹, 통계 응답
//! - `user`: 사용자와 공백 상태
//! - `void_session`: 공백 세션과 요청/응답 DTO

pub mod activity;
pub mod stat;
pub mod user;
pub mod void_session;

pub use activity::*;
pub use stat::*;
pub use user::*;
pub use void_session::*;

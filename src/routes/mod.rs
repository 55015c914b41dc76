//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! 핸들러는 요청에서 값을 꺼내 서비스 계층(services/)을 호출하고,
//! 결과를 JSON으로 돌려주는 얇은 층입니다.
//!
//! 각 하위 모듈:
//! - `activities`: 활동 라벨 목록/생성
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `stats`: 실시간/일간 통계
//! - `void`: 공백 시작/종료/취소, 기록 조회, 테스트 데이터 생성

pub mod activities;
pub mod health;
pub mod stats;
pub mod void;

// 각 모듈의 핸들러 함수들을 재공개하여
// main.rs에서 `routes::start_void`처럼 바로 접근 가능하게 합니다.
pub use activities::*;
pub use health::*;
pub use stats::*;
pub use void::*;

use crate::services::{day_boundary::DayClock, Store};

/// 모든 핸들러가 공유하는 애플리케이션 상태
///
/// `Store`는 내부에 커넥션 풀(Arc)을 들고 있으므로 clone 비용이 작습니다.
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub clock: DayClock,
    pub jwt_secret: String,
}

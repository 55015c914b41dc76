//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 서비스 계층(services/)에서 이 모듈의 함수를 호출합니다.
//!
//! 각 하위 모듈:
//! - `activities`: 활동 라벨 조회, 생성, 사용 횟수 증가
//! - `stat_cache`: 10분 버킷 통계 캐시 조회/upsert
//! - `users`: 사용자 조회와 공백 상태 전이(compare-and-set)
//! - `void_sessions`: 완료된 공백 세션 저장/조회, 랭킹 집계

pub mod activities;
pub mod stat_cache;
pub mod users;
pub mod void_sessions;

//! # 미들웨어 모듈
//!
//! - `auth`: Bearer 토큰에서 호출자 ID를 꺼내는 추출기(`AuthUser`)

pub mod auth;

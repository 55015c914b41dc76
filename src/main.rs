//! # 당밤공 통계 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. API 라우터 설정
//! 6. HTTP 서버 시작

// ── 모듈 선언 ──
mod config;
mod db;
mod error;
mod middleware;
mod models;
mod routes;
mod services;

use std::str::FromStr;

use anyhow::Result;
use axum::{
    routing::{delete, get, post},
    Router,
};
use config::Config;
use routes::*;
use services::Store;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 dangbamgong, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dangbamgong=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    let clock = config.day_clock()?;
    tracing::info!("Starting dangbamgong server on {}:{}", config.host, config.port);
    tracing::info!(
        day_start_hour = clock.day_start_hour(),
        utc_offset = %clock.offset(),
        store_timeout = ?config.store_timeout,
        "day boundary configured"
    );

    // ── 4단계: SQLite 연결 풀 생성 ──
    // 파일이 없으면 새로 만듭니다.
    let connect_options =
        SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;

    // ── 6단계: 애플리케이션 상태(State) 생성 ──
    let state = AppState {
        store: Store::new(pool, config.store_timeout),
        clock,
        jwt_secret: config.jwt_secret.clone(),
    };

    // ── 7단계: API 라우터 설정 ──
    let void_routes = Router::new()
        .route("/void/start", post(start_void))
        .route("/void/end", post(end_void))
        .route("/void/cancel", post(cancel_void))
        .route("/void/history", get(void_history));

    // 테스트 데이터 생성 라우트는 설정으로 켰을 때만 등록합니다.
    let void_routes = if config.enable_test_seed {
        tracing::warn!("ENABLE_TEST_SEED is on, registering POST /void/test");
        void_routes.route("/void/test", post(seed_void))
    } else {
        void_routes
    };

    let api_routes = Router::new()
        .merge(void_routes)
        // 통계 API
        .route("/stats/live", get(live_stat))
        .route("/stats/daily", get(daily_stat))
        // 활동 라벨 API
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/{activity_id}", delete(delete_activity))
        // 헬스체크 API
        .route("/health", get(health_check))
        .with_state(state);

    // ── 8단계: CORS 미들웨어 설정 ──
    // 개발 환경에서는 Any(모두 허용)로 설정합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

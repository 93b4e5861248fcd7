//! # ヘルスチェックハンドラ
//!
//! - `/health`: Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready`: Readiness Check（データベースへの疎通を確認）
//!
//! レスポンス型は [`bookstore_shared::HealthResponse`] / [`bookstore_shared::ReadinessResponse`] を参照。

use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use bookstore_infra::db;
use bookstore_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::SqlitePool;

/// Readiness Check のタイムアウト
const READINESS_TIMEOUT: Duration = Duration::from_secs(5);

/// Liveness Check
pub async fn health_check() -> Json<HealthResponse> {
   Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
   pub pool: SqlitePool,
}

/// Readiness Check
///
/// 全チェック OK → 200、1 つでも失敗 → 503。
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
   let database = check_database(&state.pool).await;

   let response = ReadinessResponse::from_checks(HashMap::from([(
      "database".to_string(),
      database,
   )]));
   let http_status = if response.is_ready() {
      StatusCode::OK
   } else {
      StatusCode::SERVICE_UNAVAILABLE
   };

   (http_status, Json(response))
}

/// `SELECT 1` で疎通を確認する
async fn check_database(pool: &SqlitePool) -> CheckStatus {
   match tokio::time::timeout(READINESS_TIMEOUT, db::ping(pool)).await {
      Ok(Ok(())) => CheckStatus::Ok,
      Ok(Err(e)) => {
         tracing::warn!(error = %e, "readiness check: database ping failed");
         CheckStatus::Error
      }
      Err(_) => {
         tracing::warn!("readiness check: database check timed out");
         CheckStatus::Error
      }
   }
}

//! # アプリケーション構築
//!
//! DI（コーデック・リポジトリ・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。
//!
//! ## ルーティング
//!
//! | メソッド | パス | 認証 |
//! |---------|------|------|
//! | POST | `/login` | - |
//! | GET | `/books` | - |
//! | POST | `/books` | Bearer |
//! | GET | `/books/{isbn}` | - |
//! | PUT | `/books/{isbn}` | Bearer |
//! | DELETE | `/books/{isbn}` | Bearer |
//! | GET | `/health` | - |
//! | GET | `/health/ready` | - |

use std::sync::Arc;

use axum::{
   Router,
   middleware::from_fn_with_state,
   routing::{get, post, put},
};
use bookstore_domain::clock::SystemClock;
use bookstore_infra::{
   Hs256TokenCodec,
   InfraError,
   repository::SqliteBookRepository,
};
use bookstore_shared::{
   canonical_log::CanonicalLogLineLayer,
   observability::{MakeRequestUuidV7, make_request_span},
};
use sqlx::SqlitePool;
use tower_http::{
   request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
   trace::TraceLayer,
};

use crate::{
   config::ServiceConfig,
   handler::{
      AuthState,
      BookState,
      ReadinessState,
      create_book,
      delete_book,
      get_book,
      health_check,
      list_books,
      login,
      readiness_check,
      update_book,
   },
   middleware::require_bearer_token,
   usecase::{AuthUseCaseImpl, BookUseCaseImpl},
};

/// 設定と接続プールから DI を組み立て、ルーターを返す
pub fn build_app(config: &ServiceConfig, pool: SqlitePool) -> Result<Router, InfraError> {
   let codec = Arc::new(Hs256TokenCodec::new(config.jwt_secret_key.as_bytes())?);
   let auth_usecase = AuthUseCaseImpl::new(
      config.admin_credential(),
      codec,
      Arc::new(SystemClock),
      config.access_token_expires,
   );
   let auth_state = Arc::new(AuthState {
      usecase: Arc::new(auth_usecase),
   });

   // Readiness Check 用 State（pool が move される前に clone）
   let readiness_state = Arc::new(ReadinessState { pool: pool.clone() });

   let book_repository = Arc::new(SqliteBookRepository::new(pool));
   let book_state = Arc::new(BookState {
      usecase: Arc::new(BookUseCaseImpl::new(book_repository)),
   });

   Ok(build_router(auth_state, book_state, readiness_state))
}

/// State からルーターを構築する
///
/// 書き込み系（POST/PUT/DELETE）のみベアラートークン認証を要求する。
pub fn build_router(
   auth_state: Arc<AuthState>,
   book_state: Arc<BookState>,
   readiness_state: Arc<ReadinessState>,
) -> Router {
   let protected = Router::new()
      .route("/books", post(create_book))
      .route("/books/{isbn}", put(update_book).delete(delete_book))
      .layer(from_fn_with_state(auth_state.clone(), require_bearer_token))
      .with_state(book_state.clone());

   let public = Router::new()
      .route("/books", get(list_books))
      .route("/books/{isbn}", get(get_book))
      .with_state(book_state);

   Router::new()
      .route("/health", get(health_check))
      .merge(
         Router::new()
            .route("/health/ready", get(readiness_check))
            .with_state(readiness_state),
      )
      .merge(
         Router::new()
            .route("/login", post(login))
            .with_state(auth_state),
      )
      .merge(protected)
      .merge(public)
      // レイヤー順序（外側から内側へ）:
      // SetRequestId → Trace → CanonicalLogLine → PropagateRequestId → handler
      .layer(PropagateRequestIdLayer::x_request_id())
      .layer(CanonicalLogLineLayer)
      .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
      .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

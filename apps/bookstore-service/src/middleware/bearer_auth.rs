//! # ベアラートークン認証ミドルウェア
//!
//! `Authorization: Bearer <token>` を検証し、成功時は [`Identity`] を
//! リクエストの extensions に添付してハンドラへ進める。
//! 失敗時はハンドラを実行せずにエラーレスポンスを返す。
//!
//! ## 使い方
//!
//! ```rust,ignore
//! use axum::middleware::from_fn_with_state;
//!
//! Router::new()
//!     .route("/books", post(create_book))
//!     .route_layer(from_fn_with_state(auth_state, require_bearer_token))
//! ```
//!
//! [`Identity`]: bookstore_domain::access_token::Identity

use std::sync::Arc;

use axum::{
   body::Body,
   extract::State,
   http::{HeaderMap, Request, header::AUTHORIZATION},
   middleware::Next,
   response::{IntoResponse, Response},
};
use bookstore_infra::TokenError;

use crate::{error::ApiError, handler::AuthState};

/// 認証スキーム
const BEARER_SCHEME: &str = "Bearer";

/// `Authorization` ヘッダーからトークン部分を取り出す
///
/// ヘッダーは `Bearer` とトークンの 2 語でなければならない。
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, TokenError> {
   let value = headers
      .get(AUTHORIZATION)
      .ok_or(TokenError::MissingToken)?
      .to_str()
      .map_err(|_| TokenError::InvalidHeader)?;

   let mut parts = value.split_whitespace();
   match (parts.next(), parts.next(), parts.next()) {
      (Some(BEARER_SCHEME), Some(token), None) => Ok(token),
      _ => Err(TokenError::InvalidHeader),
   }
}

/// ベアラートークン認証ミドルウェア
pub async fn require_bearer_token(
   State(state): State<Arc<AuthState>>,
   mut request: Request<Body>,
   next: Next,
) -> Response {
   let identity = match extract_bearer_token(request.headers())
      .and_then(|token| state.usecase.verify(token))
   {
      Ok(identity) => identity,
      Err(e) => {
         tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            reason = %e,
            "ベアラートークンの検証に失敗しました"
         );
         return ApiError::Unauthorized(e).into_response();
      }
   };

   request.extensions_mut().insert(identity);
   next.run(request).await
}

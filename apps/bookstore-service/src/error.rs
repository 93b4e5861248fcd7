//! # Bookstore Service エラー定義
//!
//! サービス固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! レスポンスボディは 2 種類:
//!
//! - 認証系（ログイン・トークン検証）: `{"msg": "..."}`
//! - 書籍系: `{"message": "..."}`
//!
//! 500 系の詳細はクライアントに返さず、SpanTrace 付きでログに出力する。

use axum::{
   Json,
   http::StatusCode,
   response::{IntoResponse, Response},
};
use bookstore_infra::{InfraError, TokenError};
use serde::Serialize;
use thiserror::Error;

/// 認証系のエラーレスポンス
#[derive(Debug, Serialize)]
pub struct AuthErrorResponse {
   pub msg: String,
}

/// 書籍系のレスポンス（成功・失敗共通）
#[derive(Debug, Serialize)]
pub struct MessageResponse {
   pub message: String,
}

impl MessageResponse {
   pub fn new(message: impl Into<String>) -> Self {
      Self {
         message: message.into(),
      }
   }
}

/// Bookstore Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
   /// ユーザー名またはパスワードが一致しない
   #[error("Bad username or password")]
   AuthenticationFailed,

   /// アクセストークンが無効
   #[error("{0}")]
   Unauthorized(#[from] TokenError),

   /// 書籍が見つからない
   #[error("Book not found")]
   NotFound,

   /// リクエストの内容が不正
   #[error("{0}")]
   BadRequest(String),

   /// 既に存在する ISBN で登録しようとした
   #[error("{0}")]
   Conflict(String),

   /// データベースエラー
   #[error("データベースエラー: {0}")]
   Database(#[from] InfraError),
}

impl ApiError {
   /// トークンエラーの HTTP ステータス
   ///
   /// ヘッダーなし・期限切れは 401、形式不正・署名不一致は 422。
   fn token_status(error: &TokenError) -> StatusCode {
      match error {
         TokenError::MissingToken | TokenError::TokenExpired => StatusCode::UNAUTHORIZED,
         TokenError::InvalidHeader
         | TokenError::MalformedToken(_)
         | TokenError::InvalidSignature => StatusCode::UNPROCESSABLE_ENTITY,
      }
   }
}

impl IntoResponse for ApiError {
   fn into_response(self) -> Response {
      match self {
         ApiError::AuthenticationFailed => (
            StatusCode::UNAUTHORIZED,
            Json(AuthErrorResponse {
               msg: self.to_string(),
            }),
         )
            .into_response(),
         ApiError::Unauthorized(e) => (
            Self::token_status(&e),
            Json(AuthErrorResponse { msg: e.to_string() }),
         )
            .into_response(),
         ApiError::NotFound => (
            StatusCode::NOT_FOUND,
            Json(MessageResponse::new(self.to_string())),
         )
            .into_response(),
         ApiError::BadRequest(msg) => {
            (StatusCode::BAD_REQUEST, Json(MessageResponse::new(msg))).into_response()
         }
         ApiError::Conflict(msg) => {
            (StatusCode::CONFLICT, Json(MessageResponse::new(msg))).into_response()
         }
         ApiError::Database(e) => {
            tracing::error!(
               error.kind = "database",
               error.message = %e,
               span_trace = %e.span_trace(),
               "データベースエラー"
            );
            (
               StatusCode::INTERNAL_SERVER_ERROR,
               Json(MessageResponse::new("Internal server error")),
            )
               .into_response()
         }
      }
   }
}

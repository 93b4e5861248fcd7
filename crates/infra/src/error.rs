//! # インフラ層エラー定義
//!
//! データベースや署名鍵の初期化で発生するエラーを表現する。
//!
//! ## 構造
//!
//! `std::io::Error` と同じ struct + enum パターンを採用:
//! - [`InfraError`]: エラー種別（[`InfraErrorKind`]）と [`SpanTrace`] を保持するラッパー
//! - [`InfraErrorKind`]: エラーの具体的な種別
//!
//! `From` 実装や convenience constructor でエラーを生成すると、
//! その時点のスパン情報が自動的にキャプチャされる。

use std::fmt;

use derive_more::Display;
use thiserror::Error;
use tracing_error::SpanTrace;

/// インフラ層で発生するエラー
///
/// エラー種別に応じた処理には [`kind()`](InfraError::kind) を使用する:
///
/// ```ignore
/// match error.kind() {
///     InfraErrorKind::Conflict { .. } => { /* 409 */ }
///     _ => { /* 500 */ }
/// }
/// ```
#[derive(Display)]
#[display("{kind}")]
pub struct InfraError {
   kind:       InfraErrorKind,
   span_trace: SpanTrace,
}

/// インフラ層エラーの種別
#[derive(Debug, Error)]
pub enum InfraErrorKind {
   /// データベースエラー
   ///
   /// SQL の実行失敗、接続エラー、制約違反など。
   #[error("データベースエラー: {0}")]
   Database(#[source] sqlx::Error),

   /// マイグレーションエラー
   #[error("マイグレーションエラー: {0}")]
   Migration(#[source] sqlx::migrate::MigrateError),

   /// シリアライズ/デシリアライズエラー
   #[error("シリアライズエラー: {0}")]
   Serialization(#[source] serde_json::Error),

   /// 一意制約違反
   ///
   /// 既に存在するキーで登録しようとした場合。
   #[error("競合が発生しました: {entity}(id={id})")]
   Conflict {
      /// エンティティ名（例: "Book"）
      entity: String,
      /// 重複したキー
      id:     String,
   },

   /// 予期しないエラー
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl InfraError {
   pub fn kind(&self) -> &InfraErrorKind {
      &self.kind
   }

   pub fn span_trace(&self) -> &SpanTrace {
      &self.span_trace
   }

   /// Conflict バリアントの場合、entity と id を返す
   pub fn as_conflict(&self) -> Option<(&str, &str)> {
      match &self.kind {
         InfraErrorKind::Conflict { entity, id } => Some((entity, id)),
         _ => None,
      }
   }

   /// 一意制約違反エラーを生成する
   pub fn conflict(entity: impl Into<String>, id: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Conflict {
            entity: entity.into(),
            id:     id.into(),
         },
         span_trace: SpanTrace::capture(),
      }
   }

   /// sqlx のエラーを変換する。一意制約違反は Conflict にする
   pub fn from_sqlx_with_conflict(
      source: sqlx::Error,
      entity: impl Into<String>,
      id: impl Into<String>,
   ) -> Self {
      let is_unique_violation = matches!(
         &source,
         sqlx::Error::Database(db_err) if db_err.is_unique_violation()
      );
      if is_unique_violation {
         Self::conflict(entity, id)
      } else {
         source.into()
      }
   }

   /// 予期しないエラーを生成する
   pub fn unexpected(msg: impl Into<String>) -> Self {
      Self {
         kind:       InfraErrorKind::Unexpected(msg.into()),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl fmt::Debug for InfraError {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("InfraError")
         .field("kind", &self.kind)
         .field("span_trace", &self.span_trace)
         .finish()
   }
}

impl std::error::Error for InfraError {
   fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
      self.kind.source()
   }
}

// ===== From 実装（SpanTrace 自動キャプチャ） =====

impl From<sqlx::Error> for InfraError {
   fn from(source: sqlx::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Database(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl From<sqlx::migrate::MigrateError> for InfraError {
   fn from(source: sqlx::migrate::MigrateError) -> Self {
      Self {
         kind:       InfraErrorKind::Migration(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

impl From<serde_json::Error> for InfraError {
   fn from(source: serde_json::Error) -> Self {
      Self {
         kind:       InfraErrorKind::Serialization(source),
         span_trace: SpanTrace::capture(),
      }
   }
}

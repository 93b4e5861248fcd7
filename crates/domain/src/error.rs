//! # ドメイン層エラー定義
//!
//! | エラー種別 | HTTP ステータス | 用途 |
//! |-----------|----------------|------|
//! | `Validation` | 400 Bad Request | 入力値の検証失敗 |

use thiserror::Error;

/// ドメイン層で発生するエラー
///
/// API 層でこのエラーを受け取り、HTTP レスポンスに変換する。
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
   /// バリデーションエラー
   ///
   /// 空文字列の ISBN など。
   #[error("バリデーションエラー: {0}")]
   Validation(String),
}

impl DomainError {
   pub fn validation(msg: impl Into<String>) -> Self {
      Self::Validation(msg.into())
   }
}

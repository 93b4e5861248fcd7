//! # ユースケース層
//!
//! Bookstore Service のビジネスロジックを実装する。
//!
//! - **トレイトベースの設計**: ハンドラはトレイトにのみ依存し、テストではスタブに差し替える
//! - **依存性注入**: リポジトリ・トークンコーデック・時刻を外部から注入する

pub mod auth;
pub mod book;

use async_trait::async_trait;
pub use auth::AuthUseCaseImpl;
pub use book::{BookUseCaseImpl, CreateBookInput};
use bookstore_domain::{
   access_token::{AccessToken, Identity},
   book::{Book, BookPatch, Isbn},
   credential::PlainPassword,
};
use bookstore_infra::TokenError;

use crate::error::ApiError;

/// 認証ユースケーストレイト
///
/// ストレージを使わないため同期メソッドのみ。
pub trait AuthUseCase: Send + Sync {
   /// 管理者資格情報を照合し、アクセストークンを発行する
   ///
   /// ## 戻り値
   ///
   /// - `Ok(AccessToken)`: 署名済みトークン
   /// - `Err(ApiError::AuthenticationFailed)`: ユーザー名またはパスワードが不一致
   fn login(&self, username: &str, password: &PlainPassword) -> Result<AccessToken, ApiError>;

   /// アクセストークンを検証し、認証済みアイデンティティを返す
   fn verify(&self, token: &str) -> Result<Identity, TokenError>;
}

/// 書籍ユースケーストレイト
#[async_trait]
pub trait BookUseCase: Send + Sync {
   /// 書籍を登録する
   ///
   /// ## 戻り値
   ///
   /// - `Err(ApiError::BadRequest)`: 必須フィールドの欠落
   /// - `Err(ApiError::Conflict)`: ISBN の重複
   async fn create_book(&self, input: CreateBookInput) -> Result<Book, ApiError>;

   /// 全書籍を登録順で取得する
   async fn list_books(&self) -> Result<Vec<Book>, ApiError>;

   /// ISBN で書籍を取得する
   async fn get_book(&self, isbn: &Isbn) -> Result<Book, ApiError>;

   /// 書籍を部分更新する
   async fn update_book(&self, isbn: &Isbn, patch: BookPatch) -> Result<Book, ApiError>;

   /// 書籍を削除する
   async fn delete_book(&self, isbn: &Isbn) -> Result<(), ApiError>;
}

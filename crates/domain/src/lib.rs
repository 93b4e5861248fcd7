//! # Bookstore ドメイン層
//!
//! 書籍在庫サービスのドメインモデルを定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! service → infra → domain
//! ```
//!
//! ドメイン層はデータベースや HTTP に一切依存しない。
//!
//! ## モジュール構成
//!
//! - [`book`] - 書籍エンティティ、ISBN、部分更新パッチ
//! - [`credential`] - 管理者資格情報とログイン入力
//! - [`access_token`] - アクセストークンのクレームと認証済みアイデンティティ
//! - [`clock`] - 時刻プロバイダ（トークン期限のテスト用）
//! - [`error`] - ドメインエラー
//!
//! ## 使用例
//!
//! ```rust
//! use bookstore_domain::book::{BookPatch, Isbn};
//!
//! let isbn = Isbn::new("1234567890").unwrap();
//! assert_eq!(isbn.as_str(), "1234567890");
//!
//! let patch = BookPatch {
//!     price: Some(29.99),
//!     ..BookPatch::default()
//! };
//! assert!(!patch.is_empty());
//! ```

pub mod access_token;
pub mod book;
pub mod clock;
pub mod credential;
pub mod error;

pub use error::DomainError;

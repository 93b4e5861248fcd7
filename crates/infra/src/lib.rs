//! # Bookstore インフラ層
//!
//! 外部システムとの接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: SQLite への接続プール管理とマイグレーション
//! - **リポジトリ実装**: 書籍リポジトリトレイトと SQLite 実装
//! - **トークン署名**: アクセストークンの HS256 署名・検証
//!
//! ## 依存関係
//!
//! ```text
//! service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - SQLite 接続プールとマイグレーション
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - [`token`] - アクセストークンのエンコード・検証
//! - `mock` - テスト用インメモリ実装（feature `test-utils`）
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bookstore_infra::{db, repository::SqliteBookRepository};
//!
//! async fn setup() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = db::create_pool("sqlite://books.db?mode=rwc").await?;
//!     db::run_migrations(&pool).await?;
//!
//!     let repository = SqliteBookRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod db;
pub mod error;
#[cfg(feature = "test-utils")]
pub mod mock;
pub mod repository;
pub mod token;

pub use error::{InfraError, InfraErrorKind};
pub use token::{AccessTokenCodec, Hs256TokenCodec, TokenError};

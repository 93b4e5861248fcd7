//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//! ハンドラは薄く保ち、ビジネスロジックは usecase 層に委譲する。
//!
//! ## ハンドラ一覧
//!
//! - `auth`: ログイン
//! - `book`: 書籍 CRUD
//! - `health`: ヘルスチェック

pub mod auth;
pub mod book;
pub mod health;

pub use auth::{AuthState, login};
pub use book::{BookState, create_book, delete_book, get_book, list_books, update_book};
pub use health::{ReadinessState, health_check, readiness_check};

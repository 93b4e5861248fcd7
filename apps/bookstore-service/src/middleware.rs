//! # ミドルウェア
//!
//! Bookstore Service 用のミドルウェアを提供する。

mod bearer_auth;

pub use bearer_auth::require_bearer_token;

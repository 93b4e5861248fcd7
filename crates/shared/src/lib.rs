//! # Bookstore 共有ユーティリティ
//!
//! ワークスペース全体で使用される共通ユーティリティを提供する。
//!
//! ## 設計方針
//!
//! - ドメイン知識（書籍・認証）を含まない純粋なユーティリティのみを配置
//! - HTTP 観測基盤は `observability` feature の背後に置き、
//!   domain / infra から不要な依存を引き込まない

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod health;
pub mod observability;

pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};

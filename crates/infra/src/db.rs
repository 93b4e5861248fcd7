//! # SQLite データベース接続管理
//!
//! 接続プールの作成、マイグレーション、疎通確認を行う。
//!
//! プールは起動時に一度だけ作成し、`Arc` 経由で各リポジトリに渡す。
//! グローバルなハンドルは持たない。
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use bookstore_infra::db;
//!
//! async fn example() -> Result<(), bookstore_infra::InfraError> {
//!     let pool = db::create_pool("sqlite://books.db?mode=rwc").await?;
//!     db::run_migrations(&pool).await?;
//!     db::ping(&pool).await?;
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::error::InfraError;

/// データベースマイグレーションを実行する
///
/// `sqlx::migrate!()` で埋め込まれたマイグレーションを順番に適用する。
/// 適用済みのものはスキップされる。
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), InfraError> {
   sqlx::migrate!("../../migrations").run(pool).await?;
   Ok(())
}

/// SQLite 接続プールを作成する
///
/// # 引数
///
/// * `database_url` - SQLite 接続 URL
///   - ファイル: `sqlite://books.db?mode=rwc`（`mode=rwc` でファイルを自動作成）
///   - インメモリ: `sqlite::memory:`
///
/// # 設定値
///
/// - `max_connections(5)`: SQLite は書き込みが直列化されるため少数で十分
/// - `acquire_timeout(5秒)`: 接続取得のタイムアウト
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, InfraError> {
   let pool = SqlitePoolOptions::new()
      .max_connections(5)
      .acquire_timeout(Duration::from_secs(5))
      .connect(database_url)
      .await?;
   Ok(pool)
}

/// インメモリ SQLite の接続プールを作成する
///
/// インメモリ DB は接続ごとに別の DB になるため、接続数を 1 に固定し、
/// アイドル切断もしない。
pub async fn create_in_memory_pool() -> Result<SqlitePool, InfraError> {
   let pool = SqlitePoolOptions::new()
      .max_connections(1)
      .min_connections(1)
      .idle_timeout(None)
      .max_lifetime(None)
      .connect("sqlite::memory:")
      .await?;
   Ok(pool)
}

/// 疎通確認（readiness 用）
pub async fn ping(pool: &SqlitePool) -> Result<(), InfraError> {
   sqlx::query("SELECT 1").execute(pool).await?;
   Ok(())
}

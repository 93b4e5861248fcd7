//! # リポジトリ実装
//!
//! 永続化の抽象（トレイト）と SQLite 実装を提供する。
//! ユースケース層はトレイトにのみ依存し、テストではモックに差し替える。

pub mod book_repository;

pub use book_repository::{BookRepository, SqliteBookRepository};

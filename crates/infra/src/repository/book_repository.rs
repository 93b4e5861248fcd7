//! # BookRepository
//!
//! 書籍の永続化を担当するリポジトリ。
//!
//! - 一覧は行 ID 順（= 登録順）で返す
//! - ISBN による検索は最初の一致のみを返す（`isbn` 列は UNIQUE）
//! - 更新は ISBN をキーに title / author / price / quantity を書き換える

use async_trait::async_trait;
use bookstore_domain::book::{Book, BookId, Isbn, NewBook};
use sqlx::SqlitePool;

use crate::error::InfraError;

/// 書籍リポジトリトレイト
#[async_trait]
pub trait BookRepository: Send + Sync {
   /// 書籍を登録し、採番済みの書籍を返す
   ///
   /// # 戻り値
   ///
   /// - `Ok(book)`: 登録された書籍
   /// - `Err(_)`: データベースエラー（ISBN 重複時は
   ///   [`InfraErrorKind::Conflict`](crate::error::InfraErrorKind::Conflict)）
   async fn insert(&self, book: &NewBook) -> Result<Book, InfraError>;

   /// 全書籍を登録順で取得する
   async fn find_all(&self) -> Result<Vec<Book>, InfraError>;

   /// ISBN で書籍を取得する
   ///
   /// # 戻り値
   ///
   /// - `Ok(Some(book))`: 書籍が見つかった場合
   /// - `Ok(None)`: 書籍が見つからない場合
   /// - `Err(_)`: データベースエラー
   async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, InfraError>;

   /// 書籍の内容を更新する（ISBN は変更しない）
   async fn update(&self, book: &Book) -> Result<(), InfraError>;

   /// ISBN で書籍を削除する
   ///
   /// # 戻り値
   ///
   /// - `Ok(true)`: 削除した
   /// - `Ok(false)`: 該当する書籍がなかった
   async fn delete(&self, isbn: &Isbn) -> Result<bool, InfraError>;
}

/// `books` テーブルの行
#[derive(Debug, sqlx::FromRow)]
struct BookRow {
   id:       i64,
   title:    String,
   author:   String,
   isbn:     String,
   price:    f64,
   quantity: i64,
}

impl TryFrom<BookRow> for Book {
   type Error = InfraError;

   fn try_from(row: BookRow) -> Result<Self, Self::Error> {
      let isbn = Isbn::new(row.isbn).map_err(|e| InfraError::unexpected(e.to_string()))?;
      Ok(Book::from_db(
         BookId::new(row.id),
         NewBook {
            isbn,
            title: row.title,
            author: row.author,
            price: row.price,
            quantity: row.quantity,
         },
      ))
   }
}

/// SQLite 実装の BookRepository
#[derive(Debug, Clone)]
pub struct SqliteBookRepository {
   pool: SqlitePool,
}

impl SqliteBookRepository {
   pub fn new(pool: SqlitePool) -> Self {
      Self { pool }
   }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
   #[tracing::instrument(skip_all, level = "debug", fields(isbn = %book.isbn))]
   async fn insert(&self, book: &NewBook) -> Result<Book, InfraError> {
      let result = sqlx::query(
         r#"
         INSERT INTO books (title, author, isbn, price, quantity)
         VALUES (?, ?, ?, ?, ?)
         "#,
      )
      .bind(&book.title)
      .bind(&book.author)
      .bind(book.isbn.as_str())
      .bind(book.price)
      .bind(book.quantity)
      .execute(&self.pool)
      .await
      .map_err(|e| InfraError::from_sqlx_with_conflict(e, "Book", book.isbn.as_str()))?;

      Ok(Book::from_db(
         BookId::new(result.last_insert_rowid()),
         book.clone(),
      ))
   }

   #[tracing::instrument(skip_all, level = "debug")]
   async fn find_all(&self) -> Result<Vec<Book>, InfraError> {
      let rows: Vec<BookRow> = sqlx::query_as(
         r#"
         SELECT id, title, author, isbn, price, quantity
         FROM books
         ORDER BY id
         "#,
      )
      .fetch_all(&self.pool)
      .await?;

      rows.into_iter().map(Book::try_from).collect()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%isbn))]
   async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, InfraError> {
      let row: Option<BookRow> = sqlx::query_as(
         r#"
         SELECT id, title, author, isbn, price, quantity
         FROM books
         WHERE isbn = ?
         ORDER BY id
         LIMIT 1
         "#,
      )
      .bind(isbn.as_str())
      .fetch_optional(&self.pool)
      .await?;

      row.map(Book::try_from).transpose()
   }

   #[tracing::instrument(skip_all, level = "debug", fields(isbn = %book.isbn()))]
   async fn update(&self, book: &Book) -> Result<(), InfraError> {
      sqlx::query(
         r#"
         UPDATE books
         SET title = ?, author = ?, price = ?, quantity = ?
         WHERE isbn = ?
         "#,
      )
      .bind(book.title())
      .bind(book.author())
      .bind(book.price())
      .bind(book.quantity())
      .bind(book.isbn().as_str())
      .execute(&self.pool)
      .await?;

      Ok(())
   }

   #[tracing::instrument(skip_all, level = "debug", fields(%isbn))]
   async fn delete(&self, isbn: &Isbn) -> Result<bool, InfraError> {
      let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
         .bind(isbn.as_str())
         .execute(&self.pool)
         .await?;

      Ok(result.rows_affected() > 0)
   }
}

//! # テスト用モックリポジトリ
//!
//! ユースケース・ハンドラのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! bookstore-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::sync::{
   Arc,
   Mutex,
   atomic::{AtomicBool, AtomicI64, Ordering},
};

use async_trait::async_trait;
use bookstore_domain::book::{Book, BookId, Isbn, NewBook};

use crate::{error::InfraError, repository::BookRepository};

// ===== MockBookRepository =====

/// インメモリの書籍リポジトリ
///
/// `books.isbn` の一意制約と行 ID の採番を再現する。
/// [`fail_all`](Self::fail_all) を呼ぶと以降の操作はすべてエラーを返す。
#[derive(Clone, Default)]
pub struct MockBookRepository {
   books:   Arc<Mutex<Vec<Book>>>,
   next_id: Arc<AtomicI64>,
   failing: Arc<AtomicBool>,
}

impl MockBookRepository {
   pub fn new() -> Self {
      Self::default()
   }

   /// 初期データを投入する
   pub fn add_book(&self, book: NewBook) -> Book {
      let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
      let book = Book::from_db(BookId::new(id), book);
      self.books.lock().unwrap().push(book.clone());
      book
   }

   /// 保持している書籍のスナップショット
   pub fn books(&self) -> Vec<Book> {
      self.books.lock().unwrap().clone()
   }

   /// 以降の操作をすべて失敗させる
   pub fn fail_all(&self) {
      self.failing.store(true, Ordering::SeqCst);
   }

   fn check_failing(&self) -> Result<(), InfraError> {
      if self.failing.load(Ordering::SeqCst) {
         return Err(InfraError::unexpected("mock repository failure"));
      }
      Ok(())
   }
}

#[async_trait]
impl BookRepository for MockBookRepository {
   async fn insert(&self, book: &NewBook) -> Result<Book, InfraError> {
      self.check_failing()?;
      if self
         .books
         .lock()
         .unwrap()
         .iter()
         .any(|b| b.isbn() == &book.isbn)
      {
         return Err(InfraError::conflict("Book", book.isbn.as_str()));
      }
      Ok(self.add_book(book.clone()))
   }

   async fn find_all(&self) -> Result<Vec<Book>, InfraError> {
      self.check_failing()?;
      Ok(self.books())
   }

   async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>, InfraError> {
      self.check_failing()?;
      Ok(self
         .books
         .lock()
         .unwrap()
         .iter()
         .find(|b| b.isbn() == isbn)
         .cloned())
   }

   async fn update(&self, book: &Book) -> Result<(), InfraError> {
      self.check_failing()?;
      let mut books = self.books.lock().unwrap();
      if let Some(existing) = books.iter_mut().find(|b| b.isbn() == book.isbn()) {
         *existing = book.clone();
      }
      Ok(())
   }

   async fn delete(&self, isbn: &Isbn) -> Result<bool, InfraError> {
      self.check_failing()?;
      let mut books = self.books.lock().unwrap();
      let before = books.len();
      books.retain(|b| b.isbn() != isbn);
      Ok(books.len() < before)
   }
}

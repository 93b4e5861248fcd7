//! # 書籍ユースケース
//!
//! 書籍の登録・一覧・取得・更新・削除を実装する。

use std::sync::Arc;

use async_trait::async_trait;
use bookstore_domain::{
   DomainError,
   book::{Book, BookPatch, Isbn, NewBook},
};
use bookstore_infra::repository::BookRepository;

use super::BookUseCase;
use crate::error::ApiError;

/// 書籍登録の入力
///
/// JSON の各キーは省略され得るため、すべて `Option` で受け取り
/// [`into_new_book`](Self::into_new_book) でまとめて検証する。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateBookInput {
   pub title:    Option<String>,
   pub author:   Option<String>,
   pub isbn:     Option<String>,
   pub price:    Option<f64>,
   pub quantity: Option<i64>,
}

impl CreateBookInput {
   /// 必須フィールドがすべて揃っていることを確認し、[`NewBook`] に変換する
   ///
   /// 欠落したフィールドは一度にすべて報告する。
   pub fn into_new_book(self) -> Result<NewBook, ApiError> {
      let Self {
         title,
         author,
         isbn,
         price,
         quantity,
      } = self;

      let missing: Vec<&str> = [
         ("title", title.is_none()),
         ("author", author.is_none()),
         ("isbn", isbn.is_none()),
         ("price", price.is_none()),
         ("quantity", quantity.is_none()),
      ]
      .into_iter()
      .filter_map(|(name, absent)| absent.then_some(name))
      .collect();

      let (Some(title), Some(author), Some(isbn), Some(price), Some(quantity)) =
         (title, author, isbn, price, quantity)
      else {
         return Err(ApiError::BadRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
         )));
      };

      let isbn = Isbn::new(isbn).map_err(|e| match e {
         DomainError::Validation(msg) => ApiError::BadRequest(msg),
      })?;

      Ok(NewBook {
         isbn,
         title,
         author,
         price,
         quantity,
      })
   }
}

/// 書籍ユースケースの実装
pub struct BookUseCaseImpl {
   book_repository: Arc<dyn BookRepository>,
}

impl BookUseCaseImpl {
   pub fn new(book_repository: Arc<dyn BookRepository>) -> Self {
      Self { book_repository }
   }

   async fn find_existing(&self, isbn: &Isbn) -> Result<Book, ApiError> {
      self.book_repository
         .find_by_isbn(isbn)
         .await?
         .ok_or(ApiError::NotFound)
   }
}

#[async_trait]
impl BookUseCase for BookUseCaseImpl {
   async fn create_book(&self, input: CreateBookInput) -> Result<Book, ApiError> {
      let new_book = input.into_new_book()?;

      let book = self
         .book_repository
         .insert(&new_book)
         .await
         .map_err(|e| {
            if let Some((_, isbn)) = e.as_conflict() {
               return ApiError::Conflict(format!("Book with isbn {isbn} already exists"));
            }
            ApiError::Database(e)
         })?;

      tracing::info!(isbn = %book.isbn(), "書籍を登録しました");
      Ok(book)
   }

   async fn list_books(&self) -> Result<Vec<Book>, ApiError> {
      Ok(self.book_repository.find_all().await?)
   }

   async fn get_book(&self, isbn: &Isbn) -> Result<Book, ApiError> {
      self.find_existing(isbn).await
   }

   async fn update_book(&self, isbn: &Isbn, patch: BookPatch) -> Result<Book, ApiError> {
      let existing = self.find_existing(isbn).await?;
      if patch.is_empty() {
         tracing::debug!(%isbn, "変更するフィールドがないため更新をスキップしました");
         return Ok(existing);
      }

      let book = existing.apply(patch);
      self.book_repository.update(&book).await?;

      tracing::info!(%isbn, "書籍を更新しました");
      Ok(book)
   }

   async fn delete_book(&self, isbn: &Isbn) -> Result<(), ApiError> {
      if !self.book_repository.delete(isbn).await? {
         return Err(ApiError::NotFound);
      }

      tracing::info!(%isbn, "書籍を削除しました");
      Ok(())
   }
}

#[cfg(test)]
mod tests {
   use bookstore_infra::mock::MockBookRepository;
   use pretty_assertions::assert_eq;
   use rstest::{fixture, rstest};

   use super::*;

   fn full_input(isbn: &str) -> CreateBookInput {
      CreateBookInput {
         title:    Some("Test Book".to_string()),
         author:   Some("Test Author".to_string()),
         isbn:     Some(isbn.to_string()),
         price:    Some(19.99),
         quantity: Some(100),
      }
   }

   fn isbn(value: &str) -> Isbn {
      Isbn::new(value).unwrap()
   }

   #[fixture]
   fn repo() -> MockBookRepository {
      MockBookRepository::new()
   }

   fn sut(repo: &MockBookRepository) -> BookUseCaseImpl {
      BookUseCaseImpl::new(Arc::new(repo.clone()))
   }

   // ===== CreateBookInput =====

   #[rstest]
   fn test_全フィールドが揃っていれば新規書籍に変換される() {
      let new_book = full_input("1234567890").into_new_book().unwrap();

      assert_eq!(new_book.isbn.as_str(), "1234567890");
      assert_eq!(new_book.title, "Test Book");
      assert_eq!(new_book.quantity, 100);
   }

   #[rstest]
   fn test_欠落したフィールドがすべて報告される() {
      let input = CreateBookInput {
         title: Some("Only Title".to_string()),
         ..CreateBookInput::default()
      };

      let result = input.into_new_book();

      assert!(matches!(
         result,
         Err(ApiError::BadRequest(msg)) if msg == "Missing required fields: author, isbn, price, quantity"
      ));
   }

   #[rstest]
   fn test_空文字列のisbnはバリデーションエラー() {
      let result = full_input("").into_new_book();

      assert!(matches!(
         result,
         Err(ApiError::BadRequest(msg)) if msg == "isbn must not be empty"
      ));
   }

   #[rstest]
   #[case(" 123 ")]
   #[case("1234567890123456789012345678901234567890")]
   fn test_isbnは空白や長さを変えずに受け入れる(#[case] isbn: &str) {
      let new_book = full_input(isbn).into_new_book().unwrap();

      assert_eq!(new_book.isbn.as_str(), isbn);
   }

   // ===== create_book =====

   #[rstest]
   #[tokio::test]
   async fn test_書籍を登録できる(repo: MockBookRepository) {
      let book = sut(&repo)
         .create_book(full_input("1234567890"))
         .await
         .unwrap();

      assert_eq!(book.isbn().as_str(), "1234567890");
      assert_eq!(repo.books().len(), 1);
   }

   #[rstest]
   #[tokio::test]
   async fn test_isbnが重複するとconflictで既存は変わらない(repo: MockBookRepository) {
      let sut = sut(&repo);
      sut.create_book(full_input("1234567890")).await.unwrap();

      let mut second = full_input("1234567890");
      second.title = Some("Other".to_string());
      let result = sut.create_book(second).await;

      assert!(matches!(result, Err(ApiError::Conflict(_))));
      let books = repo.books();
      assert_eq!(books.len(), 1);
      assert_eq!(books[0].title(), "Test Book");
   }

   #[rstest]
   #[tokio::test]
   async fn test_必須フィールドが欠けていると何も登録されない(repo: MockBookRepository) {
      let mut input = full_input("1234567890");
      input.price = None;

      let result = sut(&repo).create_book(input).await;

      assert!(matches!(result, Err(ApiError::BadRequest(_))));
      assert!(repo.books().is_empty());
   }

   // ===== list_books / get_book =====

   #[rstest]
   #[tokio::test]
   async fn test_一覧は登録順で返る(repo: MockBookRepository) {
      let sut = sut(&repo);
      for isbn in ["333", "111", "222"] {
         sut.create_book(full_input(isbn)).await.unwrap();
      }

      let books = sut.list_books().await.unwrap();

      let isbns: Vec<&str> = books.iter().map(|b| b.isbn().as_str()).collect();
      assert_eq!(isbns, vec!["333", "111", "222"]);
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないisbnの取得はnot_found(repo: MockBookRepository) {
      let result = sut(&repo).get_book(&isbn("0000000000")).await;

      assert!(matches!(result, Err(ApiError::NotFound)));
   }

   // ===== update_book =====

   #[rstest]
   #[tokio::test]
   async fn test_部分更新は指定したフィールドだけを変える(repo: MockBookRepository) {
      let sut = sut(&repo);
      sut.create_book(full_input("1234567890")).await.unwrap();

      let updated = sut
         .update_book(
            &isbn("1234567890"),
            BookPatch {
               price: Some(29.99),
               ..BookPatch::default()
            },
         )
         .await
         .unwrap();

      assert_eq!(updated.price(), 29.99);
      assert_eq!(updated.title(), "Test Book");
      let stored = sut.get_book(&isbn("1234567890")).await.unwrap();
      assert_eq!(stored, updated);
   }

   #[rstest]
   #[tokio::test]
   async fn test_空のパッチでは書籍は変わらない(repo: MockBookRepository) {
      let sut = sut(&repo);
      let created = sut.create_book(full_input("1234567890")).await.unwrap();

      let updated = sut
         .update_book(&isbn("1234567890"), BookPatch::default())
         .await
         .unwrap();

      assert_eq!(updated, created);
      assert_eq!(repo.books(), vec![created]);
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないisbnの更新はnot_found(repo: MockBookRepository) {
      let result = sut(&repo)
         .update_book(&isbn("0000000000"), BookPatch::default())
         .await;

      assert!(matches!(result, Err(ApiError::NotFound)));
   }

   // ===== delete_book =====

   #[rstest]
   #[tokio::test]
   async fn test_削除すると取得できなくなる(repo: MockBookRepository) {
      let sut = sut(&repo);
      sut.create_book(full_input("1234567890")).await.unwrap();

      sut.delete_book(&isbn("1234567890")).await.unwrap();

      assert!(matches!(
         sut.get_book(&isbn("1234567890")).await,
         Err(ApiError::NotFound)
      ));
   }

   #[rstest]
   #[tokio::test]
   async fn test_存在しないisbnの削除はnot_found(repo: MockBookRepository) {
      let result = sut(&repo).delete_book(&isbn("0000000000")).await;

      assert!(matches!(result, Err(ApiError::NotFound)));
   }

   // ===== ストレージエラー =====

   #[rstest]
   #[tokio::test]
   async fn test_ストレージエラーはデータベースエラーになる(repo: MockBookRepository) {
      repo.fail_all();

      let result = sut(&repo).list_books().await;

      assert!(matches!(result, Err(ApiError::Database(_))));
   }
}

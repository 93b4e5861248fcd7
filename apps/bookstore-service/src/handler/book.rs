//! # 書籍ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /books` - 書籍登録（要認証）
//! - `GET /books` - 書籍一覧
//! - `GET /books/{isbn}` - 書籍取得
//! - `PUT /books/{isbn}` - 書籍の部分更新（要認証）
//! - `DELETE /books/{isbn}` - 書籍削除（要認証）
//!
//! 要認証のハンドラはベアラーガードが添付した [`Identity`] を受け取る。

use std::sync::Arc;

use axum::{
   Extension,
   Json,
   extract::{Path, State},
   http::StatusCode,
   response::IntoResponse,
};
use bookstore_domain::{
   access_token::Identity,
   book::{Book, BookPatch, Isbn},
};
use serde::{Deserialize, Serialize};

use crate::{
   error::{ApiError, MessageResponse},
   usecase::{BookUseCase, CreateBookInput},
};

/// 書籍ハンドラの共有状態
pub struct BookState {
   pub usecase: Arc<dyn BookUseCase>,
}

// --- リクエスト/レスポンス型 ---

/// 書籍 DTO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDto {
   pub title:    String,
   pub author:   String,
   pub isbn:     String,
   pub price:    f64,
   pub quantity: i64,
}

impl From<&Book> for BookDto {
   fn from(book: &Book) -> Self {
      Self {
         title:    book.title().to_string(),
         author:   book.author().to_string(),
         isbn:     book.isbn().to_string(),
         price:    book.price(),
         quantity: book.quantity(),
      }
   }
}

/// 書籍一覧レスポンス
#[derive(Debug, Serialize)]
pub struct BooksResponse {
   pub books: Vec<BookDto>,
}

/// 書籍取得レスポンス
#[derive(Debug, Serialize)]
pub struct BookResponse {
   pub book: BookDto,
}

/// 書籍登録リクエスト
///
/// 欠落キーの検出はユースケースで行う。
#[derive(Debug, Deserialize)]
pub struct CreateBookRequest {
   pub title:    Option<String>,
   pub author:   Option<String>,
   pub isbn:     Option<String>,
   pub price:    Option<f64>,
   pub quantity: Option<i64>,
}

impl From<CreateBookRequest> for CreateBookInput {
   fn from(req: CreateBookRequest) -> Self {
      Self {
         title:    req.title,
         author:   req.author,
         isbn:     req.isbn,
         price:    req.price,
         quantity: req.quantity,
      }
   }
}

/// 書籍更新リクエスト
///
/// `isbn` キーが含まれていても無視する。
#[derive(Debug, Deserialize)]
pub struct UpdateBookRequest {
   pub title:    Option<String>,
   pub author:   Option<String>,
   pub price:    Option<f64>,
   pub quantity: Option<i64>,
}

impl From<UpdateBookRequest> for BookPatch {
   fn from(req: UpdateBookRequest) -> Self {
      Self {
         title:    req.title,
         author:   req.author,
         price:    req.price,
         quantity: req.quantity,
      }
   }
}

/// パスの ISBN を値オブジェクトに変換する
///
/// 空文字列は保存されていることもないため 404 とする。
fn parse_isbn(raw: String) -> Result<Isbn, ApiError> {
   Isbn::new(raw).map_err(|_| ApiError::NotFound)
}

// --- ハンドラ ---

/// POST /books
///
/// ## レスポンス
///
/// - `201 Created`: `{"message": "Book added successfully"}`
/// - `400 Bad Request`: 必須フィールドの欠落
/// - `409 Conflict`: ISBN の重複
#[tracing::instrument(skip_all, fields(sub = %identity.subject()))]
pub async fn create_book(
   State(state): State<Arc<BookState>>,
   Extension(identity): Extension<Identity>,
   Json(req): Json<CreateBookRequest>,
) -> Result<impl IntoResponse, ApiError> {
   state.usecase.create_book(req.into()).await?;

   Ok((
      StatusCode::CREATED,
      Json(MessageResponse::new("Book added successfully")),
   ))
}

/// GET /books
#[tracing::instrument(skip_all)]
pub async fn list_books(
   State(state): State<Arc<BookState>>,
) -> Result<impl IntoResponse, ApiError> {
   let books = state.usecase.list_books().await?;

   Ok(Json(BooksResponse {
      books: books.iter().map(BookDto::from).collect(),
   }))
}

/// GET /books/{isbn}
///
/// ## レスポンス
///
/// - `200 OK`: `{"book": {...}}`
/// - `404 Not Found`: `{"message": "Book not found"}`
#[tracing::instrument(skip_all, fields(%isbn))]
pub async fn get_book(
   State(state): State<Arc<BookState>>,
   Path(isbn): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
   let isbn = parse_isbn(isbn)?;
   let book = state.usecase.get_book(&isbn).await?;

   Ok(Json(BookResponse {
      book: BookDto::from(&book),
   }))
}

/// PUT /books/{isbn}
///
/// ボディに含まれるフィールドだけを上書きする。
#[tracing::instrument(skip_all, fields(%isbn, sub = %identity.subject()))]
pub async fn update_book(
   State(state): State<Arc<BookState>>,
   Extension(identity): Extension<Identity>,
   Path(isbn): Path<String>,
   Json(req): Json<UpdateBookRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let isbn = parse_isbn(isbn)?;
   state.usecase.update_book(&isbn, req.into()).await?;

   Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// DELETE /books/{isbn}
#[tracing::instrument(skip_all, fields(%isbn, sub = %identity.subject()))]
pub async fn delete_book(
   State(state): State<Arc<BookState>>,
   Extension(identity): Extension<Identity>,
   Path(isbn): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
   let isbn = parse_isbn(isbn)?;
   state.usecase.delete_book(&isbn).await?;

   Ok(Json(MessageResponse::new("Book deleted successfully")))
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::Body,
      http::{Method, Request},
      routing::get,
   };
   use bookstore_domain::{book::NewBook, credential::Username};
   use bookstore_infra::mock::MockBookRepository;
   use pretty_assertions::assert_eq;
   use tower::ServiceExt;

   use super::*;
   use crate::usecase::BookUseCaseImpl;

   fn seed(repo: &MockBookRepository, isbn: &str, title: &str) {
      repo.add_book(NewBook {
         isbn:     Isbn::new(isbn).unwrap(),
         title:    title.to_string(),
         author:   "Test Author".to_string(),
         price:    19.99,
         quantity: 100,
      });
   }

   /// ガードを通過済みの状態を再現するため Identity を直接添付する
   fn create_test_app(repo: &MockBookRepository) -> Router {
      let state = Arc::new(BookState {
         usecase: Arc::new(BookUseCaseImpl::new(Arc::new(repo.clone()))),
      });

      Router::new()
         .route("/books", get(list_books).post(create_book))
         .route(
            "/books/{isbn}",
            get(get_book).put(update_book).delete(delete_book),
         )
         .layer(Extension(Identity::new(Username::new("admin"))))
         .with_state(state)
   }

   fn json_request(method: Method, uri: &str, body: serde_json::Value) -> Request<Body> {
      Request::builder()
         .method(method)
         .uri(uri)
         .header("content-type", "application/json")
         .body(Body::from(serde_json::to_string(&body).unwrap()))
         .unwrap()
   }

   fn empty_request(method: Method, uri: &str) -> Request<Body> {
      Request::builder()
         .method(method)
         .uri(uri)
         .body(Body::empty())
         .unwrap()
   }

   async fn json_body(response: axum::response::Response) -> serde_json::Value {
      let body = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      serde_json::from_slice(&body).unwrap()
   }

   fn book_json(isbn: &str) -> serde_json::Value {
      serde_json::json!({
         "title": "Test Book",
         "author": "Test Author",
         "isbn": isbn,
         "price": 19.99,
         "quantity": 100
      })
   }

   #[tokio::test]
   async fn test_create_book_成功で201() {
      // Given
      let repo = MockBookRepository::new();
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(json_request(Method::POST, "/books", book_json("1234567890")))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::CREATED);
      assert_eq!(
         json_body(response).await,
         serde_json::json!({"message": "Book added successfully"})
      );
      assert_eq!(repo.books().len(), 1);
   }

   #[tokio::test]
   async fn test_create_book_フィールド欠落で400() {
      // Given
      let repo = MockBookRepository::new();
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(json_request(
            Method::POST,
            "/books",
            serde_json::json!({"title": "No ISBN"}),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::BAD_REQUEST);
      assert!(repo.books().is_empty());
   }

   #[tokio::test]
   async fn test_create_book_isbn重複で409() {
      // Given
      let repo = MockBookRepository::new();
      seed(&repo, "1234567890", "Existing");
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(json_request(Method::POST, "/books", book_json("1234567890")))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::CONFLICT);
      assert_eq!(repo.books()[0].title(), "Existing");
   }

   #[tokio::test]
   async fn test_create_book_型が違うフィールドはjsonとして拒否される() {
      // Given
      let repo = MockBookRepository::new();
      let sut = create_test_app(&repo);
      let mut body = book_json("1234567890");
      body["price"] = serde_json::json!("free");

      // When
      let response = sut
         .oneshot(json_request(Method::POST, "/books", body))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
      assert!(repo.books().is_empty());
   }

   #[tokio::test]
   async fn test_list_books_空なら空配列() {
      // Given
      let sut = create_test_app(&MockBookRepository::new());

      // When
      let response = sut
         .oneshot(empty_request(Method::GET, "/books"))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(json_body(response).await, serde_json::json!({"books": []}));
   }

   #[tokio::test]
   async fn test_list_books_登録順で5フィールドを返す() {
      // Given
      let repo = MockBookRepository::new();
      seed(&repo, "222", "B");
      seed(&repo, "111", "A");
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(empty_request(Method::GET, "/books"))
         .await
         .unwrap();

      // Then
      let json = json_body(response).await;
      let books = json["books"].as_array().unwrap();
      assert_eq!(books.len(), 2);
      assert_eq!(books[0]["isbn"], "222");
      assert_eq!(books[1]["isbn"], "111");
      assert_eq!(
         books[0].as_object().unwrap().len(),
         5,
         "title, author, isbn, price, quantity のみを含むこと"
      );
   }

   #[tokio::test]
   async fn test_get_book_存在すれば返す() {
      // Given
      let repo = MockBookRepository::new();
      seed(&repo, "1234567890", "Test Book");
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(empty_request(Method::GET, "/books/1234567890"))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      let json = json_body(response).await;
      let dto: BookDto = serde_json::from_value(json["book"].clone()).unwrap();
      assert_eq!(
         dto,
         BookDto {
            title:    "Test Book".to_string(),
            author:   "Test Author".to_string(),
            isbn:     "1234567890".to_string(),
            price:    19.99,
            quantity: 100,
         }
      );
   }

   #[tokio::test]
   async fn test_get_book_存在しなければ404() {
      // Given
      let sut = create_test_app(&MockBookRepository::new());

      // When
      let response = sut
         .oneshot(empty_request(Method::GET, "/books/0000000000"))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::NOT_FOUND);
      assert_eq!(
         json_body(response).await,
         serde_json::json!({"message": "Book not found"})
      );
   }

   #[tokio::test]
   async fn test_update_book_指定フィールドのみ更新しisbnは無視する() {
      // Given
      let repo = MockBookRepository::new();
      seed(&repo, "1234567890", "Test Book");
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(json_request(
            Method::PUT,
            "/books/1234567890",
            serde_json::json!({"price": 29.99, "isbn": "9999999999"}),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(
         json_body(response).await,
         serde_json::json!({"message": "Book updated successfully"})
      );
      let books = repo.books();
      assert_eq!(books[0].isbn().as_str(), "1234567890");
      assert_eq!(books[0].price(), 29.99);
      assert_eq!(books[0].title(), "Test Book");
   }

   #[tokio::test]
   async fn test_update_book_存在しなければ404() {
      // Given
      let sut = create_test_app(&MockBookRepository::new());

      // When
      let response = sut
         .oneshot(json_request(
            Method::PUT,
            "/books/0000000000",
            serde_json::json!({"price": 1.0}),
         ))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::NOT_FOUND);
   }

   #[tokio::test]
   async fn test_delete_book_成功で200() {
      // Given
      let repo = MockBookRepository::new();
      seed(&repo, "1234567890", "Test Book");
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(empty_request(Method::DELETE, "/books/1234567890"))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      assert_eq!(
         json_body(response).await,
         serde_json::json!({"message": "Book deleted successfully"})
      );
      assert!(repo.books().is_empty());
   }

   #[tokio::test]
   async fn test_delete_book_存在しなければ404() {
      // Given
      let sut = create_test_app(&MockBookRepository::new());

      // When
      let response = sut
         .oneshot(empty_request(Method::DELETE, "/books/0000000000"))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::NOT_FOUND);
   }

   #[tokio::test]
   async fn test_ストレージ障害は500で詳細を隠す() {
      // Given
      let repo = MockBookRepository::new();
      repo.fail_all();
      let sut = create_test_app(&repo);

      // When
      let response = sut
         .oneshot(empty_request(Method::GET, "/books"))
         .await
         .unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
      assert_eq!(
         json_body(response).await,
         serde_json::json!({"message": "Internal server error"})
      );
   }
}

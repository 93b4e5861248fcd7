//! # 書籍
//!
//! 在庫管理の唯一のエンティティである書籍と、その値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Book`] | 書籍 | 永続化済みの在庫レコード |
//! | [`Isbn`] | ISBN | 書籍の識別子。作成時にクライアントが指定し、以後不変 |
//! | [`NewBook`] | 新規書籍 | 登録時の入力（全フィールド必須） |
//! | [`BookPatch`] | 部分更新 | 更新時の入力（指定されたフィールドのみ上書き） |
//!
//! ## 設計方針
//!
//! - **ISBN は不変**: [`BookPatch`] は ISBN を持たないため、更新経路で
//!   ISBN が変わることは型レベルで起こり得ない
//! - **「未指定」は `None`**: 部分更新は JSON の形ではなく `Option` で表現する

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::DomainError;

// =========================================================================
// Isbn
// =========================================================================

/// ISBN（値オブジェクト）
///
/// 参照・更新・削除の主キーとして使う。形式（ISBN-10/13 のチェックディジット）や
/// 長さは検証せず、クライアントが指定した文字列をそのまま保持する。
/// 空文字列だけは拒否する。
///
/// ```rust
/// use bookstore_domain::book::Isbn;
///
/// let isbn = Isbn::new(" 978-4-00-000000-0 ").unwrap();
/// assert_eq!(isbn.as_str(), " 978-4-00-000000-0 ");
///
/// assert!(Isbn::new("").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(try_from = "String", into = "String")]
#[display("{_0}")]
pub struct Isbn(String);

impl Isbn {
   pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
      let value = value.into();
      if value.is_empty() {
         return Err(DomainError::validation("isbn must not be empty"));
      }
      Ok(Self(value))
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

impl TryFrom<String> for Isbn {
   type Error = DomainError;

   fn try_from(value: String) -> Result<Self, Self::Error> {
      Self::new(value)
   }
}

impl From<Isbn> for String {
   fn from(isbn: Isbn) -> Self {
      isbn.0
   }
}

// =========================================================================
// BookId
// =========================================================================

/// 書籍の行 ID
///
/// ストレージが採番する連番。API には公開しないが、一覧の並び順
/// （登録順）を決める。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display("{_0}")]
pub struct BookId(i64);

impl BookId {
   pub fn new(value: i64) -> Self {
      Self(value)
   }
}

// =========================================================================
// NewBook / BookPatch
// =========================================================================

/// 新規登録する書籍
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
   pub isbn:     Isbn,
   pub title:    String,
   pub author:   String,
   pub price:    f64,
   pub quantity: i64,
}

/// 書籍の部分更新
///
/// `None` のフィールドは既存値を維持する。ISBN は含まない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
   pub title:    Option<String>,
   pub author:   Option<String>,
   pub price:    Option<f64>,
   pub quantity: Option<i64>,
}

impl BookPatch {
   /// 何も変更しないパッチかどうか
   pub fn is_empty(&self) -> bool {
      self.title.is_none()
         && self.author.is_none()
         && self.price.is_none()
         && self.quantity.is_none()
   }
}

// =========================================================================
// Book
// =========================================================================

/// 書籍エンティティ
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
   id:       BookId,
   isbn:     Isbn,
   title:    String,
   author:   String,
   price:    f64,
   quantity: i64,
}

impl Book {
   /// データベースの行から復元する
   pub fn from_db(id: BookId, new_book: NewBook) -> Self {
      let NewBook {
         isbn,
         title,
         author,
         price,
         quantity,
      } = new_book;

      Self {
         id,
         isbn,
         title,
         author,
         price,
         quantity,
      }
   }

   /// パッチを適用した書籍を返す
   ///
   /// 指定されたフィールドだけを上書きし、ID と ISBN は保持する。
   pub fn apply(self, patch: BookPatch) -> Self {
      Self {
         title: patch.title.unwrap_or(self.title),
         author: patch.author.unwrap_or(self.author),
         price: patch.price.unwrap_or(self.price),
         quantity: patch.quantity.unwrap_or(self.quantity),
         ..self
      }
   }

   // Getter メソッド

   pub fn id(&self) -> BookId {
      self.id
   }

   pub fn isbn(&self) -> &Isbn {
      &self.isbn
   }

   pub fn title(&self) -> &str {
      &self.title
   }

   pub fn author(&self) -> &str {
      &self.author
   }

   pub fn price(&self) -> f64 {
      self.price
   }

   pub fn quantity(&self) -> i64 {
      self.quantity
   }
}

//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用する書籍生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use bookstore_domain::book::{Isbn, NewBook};

/// テスト用の新規書籍を生成する
pub fn new_book(isbn: &str) -> NewBook {
   NewBook {
      isbn:     Isbn::new(isbn).unwrap(),
      title:    "Test Book".to_string(),
      author:   "Test Author".to_string(),
      price:    19.99,
      quantity: 100,
   }
}

/// タイトルを指定して新規書籍を生成する
pub fn new_book_titled(isbn: &str, title: &str) -> NewBook {
   NewBook {
      title: title.to_string(),
      ..new_book(isbn)
   }
}

//! # 管理者資格情報
//!
//! ログインで照合される唯一の資格情報と、ログイン時の入力値を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`Username`] | ユーザー名 | トークンの subject になる識別子 |
//! | [`PlainPassword`] | 平文パスワード | ログイン時の入力値 |
//! | [`AdminCredential`] | 管理者資格情報 | 設定から読み込む照合対象 |
//! | [`CredentialVerifyResult`] | 照合結果 | ログイン照合の成否 |
//!
//! ## 設計方針
//!
//! - 照合は定数時間比較で行い、一致した文字数がタイミングから推測できないようにする
//! - ユーザー名とパスワードは両方とも比較してから結果を合成する（短絡評価しない）

use derive_more::Display;
use subtle::ConstantTimeEq;

/// ユーザー名
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display("{_0}")]
pub struct Username(String);

impl Username {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// 平文パスワード
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone)]
pub struct PlainPassword(String);

impl std::fmt::Debug for PlainPassword {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("PlainPassword").field(&"[REDACTED]").finish()
   }
}

impl PlainPassword {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }
}

/// 照合結果
///
/// bool ではなく専用の型を使い、呼び出し側で意図を明示させる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialVerifyResult {
   /// ユーザー名・パスワードとも一致した
   Match,
   /// どちらか（または両方）が一致しなかった
   Mismatch,
}

impl CredentialVerifyResult {
   pub fn is_match(&self) -> bool {
      matches!(self, Self::Match)
   }
}

/// 管理者資格情報
///
/// サービス全体で一組だけ存在する。
#[derive(Debug, Clone)]
pub struct AdminCredential {
   username: Username,
   password: PlainPassword,
}

impl AdminCredential {
   pub fn new(username: Username, password: PlainPassword) -> Self {
      Self { username, password }
   }

   /// 入力値と照合する
   ///
   /// 空文字列の入力も通常の値として比較する（設定値が空でない限り不一致になる）。
   pub fn verify(&self, username: &str, password: &PlainPassword) -> CredentialVerifyResult {
      let username_eq = self.username.as_str().as_bytes().ct_eq(username.as_bytes());
      let password_eq = self
         .password
         .as_str()
         .as_bytes()
         .ct_eq(password.as_str().as_bytes());

      if bool::from(username_eq & password_eq) {
         CredentialVerifyResult::Match
      } else {
         CredentialVerifyResult::Mismatch
      }
   }
}

//! # アクセストークン
//!
//! ログイン成功時に発行するトークンのクレームと、検証後に得られる
//! 認証済みアイデンティティを定義する。署名・エンコードはインフラ層が担う。
//!
//! ## クレーム
//!
//! | クレーム | 内容 |
//! |---------|------|
//! | `sub` | ユーザー名 |
//! | `iat` / `nbf` | 発行時刻（UNIX 秒） |
//! | `exp` | 有効期限（UNIX 秒） |
//! | `jti` | トークン ID（UUID v4） |
//! | `type` | 常に `"access"` |
//! | `fresh` | 常に `false` |

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::credential::Username;

/// トークン種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
   Access,
}

/// アクセストークンのクレーム
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
   pub sub:        String,
   pub iat:        i64,
   pub nbf:        i64,
   pub exp:        i64,
   pub jti:        Uuid,
   #[serde(rename = "type")]
   pub token_type: TokenType,
   pub fresh:      bool,
}

impl AccessClaims {
   /// 発行時刻と有効期間からクレームを組み立てる
   pub fn issue(subject: &Username, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
      let iat = issued_at.timestamp();
      Self {
         sub: subject.as_str().to_string(),
         iat,
         nbf: iat,
         exp: iat + lifetime.num_seconds(),
         jti: Uuid::new_v4(),
         token_type: TokenType::Access,
         fresh: false,
      }
   }

   /// `now` 時点で期限切れかどうか
   ///
   /// `exp` ちょうどの時刻は期限切れとして扱う。
   pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
      self.exp <= now.timestamp()
   }

   pub fn identity(&self) -> Identity {
      Identity::new(Username::new(self.sub.clone()))
   }
}

/// エンコード済みのアクセストークン
///
/// # セキュリティ
///
/// Debug 出力ではトークンの値をマスクする。
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl std::fmt::Debug for AccessToken {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
   }
}

impl AccessToken {
   pub fn new(value: impl Into<String>) -> Self {
      Self(value.into())
   }

   pub fn as_str(&self) -> &str {
      &self.0
   }

   pub fn into_string(self) -> String {
      self.0
   }
}

/// 認証済みアイデンティティ
///
/// ベアラーガードが検証に成功したときにリクエストへ添付される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
   subject: Username,
}

impl Identity {
   pub fn new(subject: Username) -> Self {
      Self { subject }
   }

   pub fn subject(&self) -> &Username {
      &self.subject
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;

   use super::*;

   fn issued_at() -> DateTime<Utc> {
      DateTime::from_timestamp(1_700_000_000, 0).unwrap()
   }

   #[rstest]
   fn test_issueで有効期限が発行時刻と有効期間の和になる() {
      let claims =
         AccessClaims::issue(&Username::new("admin"), issued_at(), Duration::seconds(900));

      assert_eq!(claims.sub, "admin");
      assert_eq!(claims.iat, 1_700_000_000);
      assert_eq!(claims.nbf, 1_700_000_000);
      assert_eq!(claims.exp, 1_700_000_900);
      assert_eq!(claims.token_type, TokenType::Access);
      assert!(!claims.fresh);
      assert_eq!(claims.jti.get_version_num(), 4);
   }

   #[rstest]
   fn test_発行ごとにjtiが異なる() {
      let a = AccessClaims::issue(&Username::new("admin"), issued_at(), Duration::seconds(900));
      let b = AccessClaims::issue(&Username::new("admin"), issued_at(), Duration::seconds(900));

      assert_ne!(a.jti, b.jti);
   }

   #[rstest]
   #[case(899, false)]
   #[case(900, true)]
   #[case(901, true)]
   fn test_is_expiredは有効期限ちょうどで期限切れになる(
      #[case] elapsed: i64,
      #[case] expected: bool,
   ) {
      let claims =
         AccessClaims::issue(&Username::new("admin"), issued_at(), Duration::seconds(900));
      let now = issued_at() + Duration::seconds(elapsed);

      assert_eq!(claims.is_expired(now), expected);
   }

   #[rstest]
   fn test_クレームのjson形状() {
      let claims =
         AccessClaims::issue(&Username::new("admin"), issued_at(), Duration::seconds(900));

      let json = serde_json::to_value(&claims).unwrap();

      assert_eq!(json["type"], "access");
      assert_eq!(json["fresh"], false);
      assert_eq!(json["sub"], "admin");
      assert!(json.get("token_type").is_none());
   }

   #[rstest]
   fn test_identityはsubjectをユーザー名として持つ() {
      let claims =
         AccessClaims::issue(&Username::new("admin"), issued_at(), Duration::seconds(900));

      assert_eq!(claims.identity().subject().as_str(), "admin");
   }

   #[rstest]
   fn test_access_tokenのdebug出力はマスクされる() {
      let token = AccessToken::new("header.payload.signature");

      assert!(!format!("{token:?}").contains("payload"));
   }
}

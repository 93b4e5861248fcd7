//! # Bookstore Service 設定
//!
//! 環境変数から Bookstore Service サーバーの設定を読み込む。
//!
//! | 変数名 | 必須 | デフォルト |
//! |--------|------|-----------|
//! | `BOOKSTORE_HOST` | No | `0.0.0.0` |
//! | `BOOKSTORE_PORT` | No | `5000` |
//! | `DATABASE_URL` | No | `sqlite://books.db?mode=rwc` |
//! | `ADMIN_USERNAME` | No | `admin` |
//! | `ADMIN_PASSWORD` | No | `admin_password` |
//! | `JWT_SECRET_KEY` | **Yes** | - |
//! | `JWT_ACCESS_TOKEN_EXPIRES` | No | `900`（秒） |

use std::env;

use bookstore_domain::credential::{AdminCredential, PlainPassword, Username};
use chrono::Duration;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_URL: &str = "sqlite://books.db?mode=rwc";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin_password";
const DEFAULT_ACCESS_TOKEN_EXPIRES_SECS: i64 = 900;

/// 設定読み込みエラー
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
   /// 必須の環境変数が未設定
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   /// 値が不正
   #[error("{key} の値が不正です: {value:?}（{reason}）")]
   Invalid {
      key:    &'static str,
      value:  String,
      reason: String,
   },
}

/// Bookstore Service サーバーの設定
#[derive(Clone)]
pub struct ServiceConfig {
   /// バインドアドレス
   pub host:                 String,
   /// ポート番号
   pub port:                 u16,
   /// データベース接続 URL
   pub database_url:         String,
   /// 管理者ユーザー名
   pub admin_username:       String,
   /// 管理者パスワード
   pub admin_password:       String,
   /// アクセストークンの署名鍵
   pub jwt_secret_key:       String,
   /// アクセストークンの有効期間
   pub access_token_expires: Duration,
}

impl std::fmt::Debug for ServiceConfig {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("ServiceConfig")
         .field("host", &self.host)
         .field("port", &self.port)
         .field("database_url", &self.database_url)
         .field("admin_username", &self.admin_username)
         .field("admin_password", &"[REDACTED]")
         .field("jwt_secret_key", &"[REDACTED]")
         .field("access_token_expires", &self.access_token_expires)
         .finish()
   }
}

impl ServiceConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// 任意のキー参照関数から設定を読み込む
   ///
   /// テストではプロセスの環境変数を書き換えずに HashMap などを渡す。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let port = match lookup("BOOKSTORE_PORT") {
         Some(value) => value.parse::<u16>().map_err(|e| {
            ConfigError::Invalid {
               key: "BOOKSTORE_PORT",
               value,
               reason: e.to_string(),
            }
         })?,
         None => DEFAULT_PORT,
      };

      let access_token_expires = match lookup("JWT_ACCESS_TOKEN_EXPIRES") {
         Some(value) => value
            .parse::<i64>()
            .map_err(|e| e.to_string())
            .and_then(|secs| {
               (secs > 0)
                  .then(|| Duration::try_seconds(secs))
                  .flatten()
                  .ok_or_else(|| "正の秒数である必要があります".to_string())
            })
            .map_err(|reason| ConfigError::Invalid {
               key: "JWT_ACCESS_TOKEN_EXPIRES",
               value,
               reason,
            })?,
         None => Duration::seconds(DEFAULT_ACCESS_TOKEN_EXPIRES_SECS),
      };

      let jwt_secret_key = lookup("JWT_SECRET_KEY")
         .filter(|v| !v.is_empty())
         .ok_or(ConfigError::Missing("JWT_SECRET_KEY"))?;

      Ok(Self {
         host: lookup("BOOKSTORE_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
         port,
         database_url: lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
         admin_username: lookup("ADMIN_USERNAME")
            .unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
         admin_password: lookup("ADMIN_PASSWORD")
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string()),
         jwt_secret_key,
         access_token_expires,
      })
   }

   /// 照合対象の管理者資格情報
   pub fn admin_credential(&self) -> AdminCredential {
      AdminCredential::new(
         Username::new(self.admin_username.clone()),
         PlainPassword::new(self.admin_password.clone()),
      )
   }
}

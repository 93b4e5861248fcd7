//! # 認証ユースケース
//!
//! ログイン（資格情報の照合とトークン発行）と、トークン検証を実装する。
//!
//! 検証の順序は「構造 → 署名 → 有効期間」。構造と署名はコーデックが、
//! 有効期間は注入された [`Clock`] の時刻でここが判定する。

use std::sync::Arc;

use bookstore_domain::{
   access_token::{AccessClaims, AccessToken, Identity},
   clock::Clock,
   credential::{AdminCredential, PlainPassword, Username},
};
use bookstore_infra::{AccessTokenCodec, TokenError};
use chrono::Duration;

use super::AuthUseCase;
use crate::error::ApiError;

/// 認証ユースケースの実装
pub struct AuthUseCaseImpl {
   credential:     AdminCredential,
   codec:          Arc<dyn AccessTokenCodec>,
   clock:          Arc<dyn Clock>,
   token_lifetime: Duration,
}

impl AuthUseCaseImpl {
   pub fn new(
      credential: AdminCredential,
      codec: Arc<dyn AccessTokenCodec>,
      clock: Arc<dyn Clock>,
      token_lifetime: Duration,
   ) -> Self {
      Self {
         credential,
         codec,
         clock,
         token_lifetime,
      }
   }
}

impl AuthUseCase for AuthUseCaseImpl {
   fn login(&self, username: &str, password: &PlainPassword) -> Result<AccessToken, ApiError> {
      if !self.credential.verify(username, password).is_match() {
         tracing::info!("ログイン失敗: 資格情報が一致しません");
         return Err(ApiError::AuthenticationFailed);
      }

      let claims = AccessClaims::issue(
         &Username::new(username),
         self.clock.now(),
         self.token_lifetime,
      );
      let token = self.codec.encode(&claims)?;

      tracing::info!(sub = %claims.sub, jti = %claims.jti, "ログイン成功: アクセストークンを発行しました");
      Ok(token)
   }

   fn verify(&self, token: &str) -> Result<Identity, TokenError> {
      let claims = self.codec.decode(token)?;
      let now = self.clock.now();

      if claims.nbf > now.timestamp() {
         return Err(TokenError::MalformedToken(
            "The token is not yet valid (nbf)".to_string(),
         ));
      }
      if claims.is_expired(now) {
         return Err(TokenError::TokenExpired);
      }

      Ok(claims.identity())
   }
}

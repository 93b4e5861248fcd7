//! # アクセストークンのエンコード・検証
//!
//! アクセストークンを HS256 署名付きのコンパクト JWS として表現する。
//!
//! ```text
//! base64url(header) . base64url(claims) . base64url(HMAC-SHA256(header.claims))
//! ```
//!
//! ヘッダーは常に `{"alg":"HS256","typ":"JWT"}`。
//!
//! ## 検証順序
//!
//! 1. セグメント数・base64・ヘッダー JSON・`alg` の検査（[`TokenError::MalformedToken`]）
//! 2. 署名の検査（[`TokenError::InvalidSignature`]）
//! 3. クレーム JSON の検査（[`TokenError::MalformedToken`]）
//!
//! 有効期限は時刻に依存するため、ここでは判定せずユースケース層が
//! [`AccessClaims::is_expired`] で判定する。

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use bookstore_domain::access_token::{AccessClaims, AccessToken};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use crate::error::InfraError;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";
const TOKEN_TYPE: &str = "JWT";

/// アクセストークン検証の失敗理由
///
/// `Display` はそのままクライアントへ返すメッセージになる。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
   /// `Authorization` ヘッダーがない
   #[error("Missing Authorization Header")]
   MissingToken,

   /// `Authorization` ヘッダーが `Bearer <token>` 形式でない
   #[error("Bad Authorization header. Expected 'Authorization: Bearer <JWT>'")]
   InvalidHeader,

   /// トークンの構造が壊れている
   #[error("{0}")]
   MalformedToken(String),

   /// 署名が一致しない
   #[error("Signature verification failed")]
   InvalidSignature,

   /// 有効期限切れ
   #[error("Token has expired")]
   TokenExpired,
}

impl TokenError {
   fn malformed(reason: impl Into<String>) -> Self {
      Self::MalformedToken(reason.into())
   }
}

#[derive(Debug, Serialize, Deserialize)]
struct JwsHeader {
   alg: String,
   #[serde(default, skip_serializing_if = "Option::is_none")]
   typ: Option<String>,
}

/// アクセストークンの署名・検証を行うトレイト
pub trait AccessTokenCodec: Send + Sync {
   /// クレームに署名してトークン文字列にする
   fn encode(&self, claims: &AccessClaims) -> Result<AccessToken, InfraError>;

   /// トークン文字列の構造と署名を検証し、クレームを取り出す
   fn decode(&self, token: &str) -> Result<AccessClaims, TokenError>;
}

/// HS256（HMAC-SHA256）実装
///
/// 鍵付き HMAC を保持し、署名のたびに複製して使う。
#[derive(Clone)]
pub struct Hs256TokenCodec {
   mac: HmacSha256,
}

impl std::fmt::Debug for Hs256TokenCodec {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("Hs256TokenCodec")
         .field("secret", &"[REDACTED]")
         .finish()
   }
}

impl Hs256TokenCodec {
   pub fn new(secret: &[u8]) -> Result<Self, InfraError> {
      let mac = HmacSha256::new_from_slice(secret)
         .map_err(|e| InfraError::unexpected(format!("署名鍵の初期化に失敗: {e}")))?;
      Ok(Self { mac })
   }

   fn sign(&self, signing_input: &str) -> Vec<u8> {
      let mut mac = self.mac.clone();
      mac.update(signing_input.as_bytes());
      mac.finalize().into_bytes().to_vec()
   }

   fn verify_signature(&self, signing_input: &str, signature: &[u8]) -> Result<(), TokenError> {
      let mut mac = self.mac.clone();
      mac.update(signing_input.as_bytes());
      // verify_slice は定数時間比較
      mac.verify_slice(signature)
         .map_err(|_| TokenError::InvalidSignature)
   }
}

impl AccessTokenCodec for Hs256TokenCodec {
   fn encode(&self, claims: &AccessClaims) -> Result<AccessToken, InfraError> {
      let header = JwsHeader {
         alg: ALGORITHM.to_string(),
         typ: Some(TOKEN_TYPE.to_string()),
      };
      let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header)?);
      let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims)?);

      let signing_input = format!("{header}.{payload}");
      let signature = URL_SAFE_NO_PAD.encode(self.sign(&signing_input));

      Ok(AccessToken::new(format!("{signing_input}.{signature}")))
   }

   fn decode(&self, token: &str) -> Result<AccessClaims, TokenError> {
      let segments: Vec<&str> = token.split('.').collect();
      let [header_b64, payload_b64, signature_b64] = segments.as_slice() else {
         return Err(TokenError::malformed("Not enough segments"));
      };

      let header_bytes = URL_SAFE_NO_PAD
         .decode(header_b64)
         .map_err(|_| TokenError::malformed("Invalid header padding"))?;
      let header: JwsHeader = serde_json::from_slice(&header_bytes)
         .map_err(|e| TokenError::malformed(format!("Invalid header string: {e}")))?;
      if header.alg != ALGORITHM {
         return Err(TokenError::malformed("The specified alg value is not allowed"));
      }

      let payload_bytes = URL_SAFE_NO_PAD
         .decode(payload_b64)
         .map_err(|_| TokenError::malformed("Invalid payload padding"))?;
      let signature = URL_SAFE_NO_PAD
         .decode(signature_b64)
         .map_err(|_| TokenError::malformed("Invalid crypto padding"))?;

      let signing_input = format!("{header_b64}.{payload_b64}");
      self.verify_signature(&signing_input, &signature)?;

      serde_json::from_slice(&payload_bytes)
         .map_err(|e| TokenError::malformed(format!("Invalid payload string: {e}")))
   }
}

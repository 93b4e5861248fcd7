//! # 認証ハンドラ
//!
//! - `POST /login` - 管理者ログイン（アクセストークン発行）

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use bookstore_domain::credential::PlainPassword;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::ApiError, usecase::AuthUseCase};

/// 認証ハンドラとベアラーガードの共有状態
pub struct AuthState {
   pub usecase: Arc<dyn AuthUseCase>,
}

/// ログインリクエスト
///
/// キーの欠落や文字列以外の値でもデシリアライズは成功させ、照合で失敗させる。
/// パスワードを含むため Debug は実装しない。
#[derive(Deserialize)]
pub struct LoginRequest {
   #[serde(default)]
   pub username: Option<Value>,
   #[serde(default)]
   pub password: Option<Value>,
}

/// ログインレスポンス
#[derive(Debug, Serialize)]
pub struct LoginResponse {
   pub access_token: String,
}

/// POST /login
///
/// ## レスポンス
///
/// - `200 OK`: `{"access_token": "..."}`
/// - `401 Unauthorized`: `{"msg": "Bad username or password"}`
#[tracing::instrument(skip_all)]
pub async fn login(
   State(state): State<Arc<AuthState>>,
   Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
   let (Some(Value::String(username)), Some(Value::String(password))) =
      (req.username, req.password)
   else {
      tracing::info!("ログイン失敗: username または password が文字列で指定されていません");
      return Err(ApiError::AuthenticationFailed);
   };

   let token = state
      .usecase
      .login(&username, &PlainPassword::new(password))?;

   Ok(Json(LoginResponse {
      access_token: token.into_string(),
   }))
}

#[cfg(test)]
mod tests {
   use axum::{
      Router,
      body::Body,
      http::{Method, Request, StatusCode},
      routing::post,
   };
   use bookstore_domain::access_token::{AccessToken, Identity};
   use bookstore_infra::TokenError;
   use rstest::rstest;
   use tower::ServiceExt;

   use super::*;

   /// admin / admin_password のときだけ固定トークンを返すスタブ
   struct StubAuthUseCase;

   impl AuthUseCase for StubAuthUseCase {
      fn login(&self, username: &str, password: &PlainPassword) -> Result<AccessToken, ApiError> {
         if username == "admin" && password.as_str() == "admin_password" {
            Ok(AccessToken::new("stub.access.token"))
         } else {
            Err(ApiError::AuthenticationFailed)
         }
      }

      fn verify(&self, _token: &str) -> Result<Identity, TokenError> {
         Err(TokenError::InvalidSignature)
      }
   }

   fn create_test_app() -> Router {
      let state = Arc::new(AuthState {
         usecase: Arc::new(StubAuthUseCase),
      });

      Router::new()
         .route("/login", post(login))
         .with_state(state)
   }

   fn login_request(body: serde_json::Value) -> Request<Body> {
      Request::builder()
         .method(Method::POST)
         .uri("/login")
         .header("content-type", "application/json")
         .body(Body::from(serde_json::to_string(&body).unwrap()))
         .unwrap()
   }

   async fn json_body(response: axum::response::Response) -> serde_json::Value {
      let body = axum::body::to_bytes(response.into_body(), usize::MAX)
         .await
         .unwrap();
      serde_json::from_slice(&body).unwrap()
   }

   #[tokio::test]
   async fn test_login_成功するとアクセストークンが返る() {
      // Given
      let sut = create_test_app();
      let request = login_request(serde_json::json!({
         "username": "admin",
         "password": "admin_password"
      }));

      // When
      let response = sut.oneshot(request).await.unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::OK);
      let json = json_body(response).await;
      assert_eq!(json, serde_json::json!({"access_token": "stub.access.token"}));
   }

   #[tokio::test]
   async fn test_login_パスワード不一致で401() {
      // Given
      let sut = create_test_app();
      let request = login_request(serde_json::json!({
         "username": "admin",
         "password": "wrong_password"
      }));

      // When
      let response = sut.oneshot(request).await.unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
      let json = json_body(response).await;
      assert_eq!(json, serde_json::json!({"msg": "Bad username or password"}));
   }

   #[tokio::test]
   async fn test_login_キーが欠けていると401() {
      // Given
      let sut = create_test_app();
      let request = login_request(serde_json::json!({"username": "admin"}));

      // When
      let response = sut.oneshot(request).await.unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
   }

   #[rstest]
   #[case::整数(serde_json::json!({"username": 1, "password": 2}))]
   #[case::真偽値(serde_json::json!({"username": true, "password": false}))]
   #[case::オブジェクト(serde_json::json!({"username": {"a": 1}, "password": ["x"]}))]
   #[case::片方だけ文字列(serde_json::json!({"username": "admin", "password": 0}))]
   #[tokio::test]
   async fn test_login_文字列以外の資格情報は401(#[case] body: serde_json::Value) {
      // Given
      let sut = create_test_app();
      let request = login_request(body);

      // When
      let response = sut.oneshot(request).await.unwrap();

      // Then
      assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
      let json = json_body(response).await;
      assert_eq!(json, serde_json::json!({"msg": "Bad username or password"}));
   }

   #[tokio::test]
   async fn test_login_jsonでないボディは拒否される() {
      // Given
      let sut = create_test_app();
      let request = Request::builder()
         .method(Method::POST)
         .uri("/login")
         .header("content-type", "application/json")
         .body(Body::from("not json"))
         .unwrap();

      // When
      let response = sut.oneshot(request).await.unwrap();

      // Then
      assert!(response.status().is_client_error());
      assert_ne!(response.status(), StatusCode::UNAUTHORIZED);
   }
}

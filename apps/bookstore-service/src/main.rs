//! # Bookstore Service サーバー
//!
//! 書店の在庫（書籍）を管理する HTTP API サーバー。
//!
//! ## 役割
//!
//! - **ログイン**: 管理者の資格情報を検証し、アクセストークンを発行する
//! - **書籍 CRUD**: ISBN をキーに書籍を登録・参照・更新・削除する
//! - **認可**: 書き込み系エンドポイントはベアラートークンを要求する
//!
//! ## 環境変数
//!
//! 一覧は [`config`](bookstore_service::config) を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境
//! JWT_SECRET_KEY=dev-secret cargo run -p bookstore-service
//!
//! # 本番環境
//! LOG_FORMAT=json JWT_SECRET_KEY=... cargo run -p bookstore-service --release
//! ```

use std::net::SocketAddr;

use anyhow::Context as _;
use bookstore_infra::db;
use bookstore_service::{app_builder::build_app, config::ServiceConfig};
use bookstore_shared::observability::TracingConfig;
use tokio::net::TcpListener;

/// Bookstore Service サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. 設定の読み込み
/// 4. データベース接続とマイグレーション
/// 5. ルーターの構築と HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
   // .env ファイルを読み込む（存在する場合）
   dotenvy::dotenv().ok();

   // トレーシング初期化
   let tracing_config = TracingConfig::from_env("bookstore-service");
   bookstore_shared::observability::init_tracing(tracing_config);
   let _tracing_guard = tracing::info_span!("app", service = "bookstore-service").entered();

   // 設定読み込み
   let config = ServiceConfig::from_env().context("設定の読み込みに失敗しました")?;

   tracing::info!(
      "Bookstore Service サーバーを起動します: {}:{}",
      config.host,
      config.port
   );

   // データベース接続プールを作成
   let pool = db::create_pool(&config.database_url)
      .await
      .context("データベース接続に失敗しました")?;
   tracing::info!("データベースに接続しました");

   // マイグレーション実行
   db::run_migrations(&pool)
      .await
      .context("マイグレーションの実行に失敗しました")?;
   tracing::info!("マイグレーションを適用しました");

   let app = build_app(&config, pool).context("アプリケーションの構築に失敗しました")?;

   let addr: SocketAddr = format!("{}:{}", config.host, config.port)
      .parse()
      .context("アドレスのパースに失敗しました")?;

   let listener = TcpListener::bind(addr).await?;
   tracing::info!("Bookstore Service サーバーが起動しました: {}", addr);

   axum::serve(listener, app).await?;

   Ok(())
}

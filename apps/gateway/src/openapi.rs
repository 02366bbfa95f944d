//! # OpenAPI 仕様定義
//!
//! utoipa を使用してゲートウェイの OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use utoipa::OpenApi;

use crate::handler::{auth, health, idea};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "VentureLens API",
      version = "0.1.0",
      description = "スタートアップアイデア検証サービス VentureLens のゲートウェイ API"
   ),
   paths(
      // health
      health::root_status,
      health::health_check,
      health::readiness_check,
      // auth
      auth::signup,
      auth::login,
      // analysis
      idea::validate_idea,
      idea::stream_validate_idea,
   ),
   tags(
      (name = "health", description = "稼働確認・ヘルスチェック"),
      (name = "auth", description = "サインアップ・ログイン（Supabase Auth への中継）"),
      (name = "analysis", description = "スタートアップアイデア分析（Mistral）")
   )
)]
pub struct ApiDoc;

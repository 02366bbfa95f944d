//! # VentureLens ゲートウェイライブラリ
//!
//! 認証プロバイダ（Supabase）と言語モデルプロバイダ（Mistral）の前に立つ
//! 薄い HTTP ゲートウェイのコアモジュール。データを持たず、必須フィールドの検証、
//! プロバイダ呼び出し、応答の整形だけを行う。
//!
//! ## モジュール構成
//!
//! - `app_builder`: DI とルーター構築
//! - `client`: 外部プロバイダクライアント（Supabase、Mistral、SSE パーサー）
//! - `config`: 環境変数からの設定読み込み
//! - `error`: エラー型と HTTP レスポンスへの変換
//! - `handler`: HTTP ハンドラ
//! - `middleware`: ミドルウェア（キャッシュ制御）
//! - `openapi`: OpenAPI 仕様定義
//! - `usecase`: プロバイダ呼び出しと結果の整形

pub mod app_builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod openapi;
pub mod usecase;

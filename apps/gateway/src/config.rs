//! # ゲートウェイ設定
//!
//! 環境変数からゲートウェイサーバーの設定を読み込む。
//!
//! プロバイダの接続情報はいずれも任意で、欠けている場合は該当クライアントを
//! 初期化しないだけで起動は継続する。空文字列は未設定として扱う。

use std::env;

use strum::{EnumString, IntoStaticStr};
use thiserror::Error;

use crate::client::model_provider::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// 既定のバインドアドレス
const DEFAULT_HOST: &str = "0.0.0.0";

/// 既定のポート番号
const DEFAULT_PORT: u16 = 5000;

/// 設定読み込みエラー
#[derive(Debug, Error)]
pub enum ConfigError {
   /// 値の形式が不正
   #[error("{name} の値が不正です: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// ストリーミング中に発生したエラーの伝え方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StreamErrorMode {
   /// レスポンスボディを異常終了させる（終端チャンクを送らない）
   #[default]
   Abort,
   /// 最終チャンクとして `{"error": "..."}` を書き込み、正常終了する
   InBand,
}

/// ゲートウェイサーバーの設定
#[derive(Debug, Clone)]
pub struct GatewayConfig {
   /// バインドアドレス
   pub host: String,
   /// ポート番号
   pub port: u16,
   /// Supabase プロジェクト URL
   pub supabase_url: Option<String>,
   /// Supabase API キー
   pub supabase_key: Option<String>,
   /// Mistral API キー
   pub mistral_api_key: Option<String>,
   /// Mistral モデル名
   pub mistral_model: String,
   /// Mistral API ベース URL
   pub mistral_base_url: String,
   /// ストリーミングエラーの伝え方
   pub stream_error_mode: StreamErrorMode,
}

impl GatewayConfig {
   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|name| env::var(name).ok())
   }

   /// 任意の読み取り関数から設定を組み立てる
   ///
   /// テストではプロセスの環境変数を書き換えずにこちらを使う。
   pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
      let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

      let port = match get("APP_PORT") {
         Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "APP_PORT",
            value,
         })?,
         None => DEFAULT_PORT,
      };

      let stream_error_mode = match get("STREAM_ERROR_MODE") {
         Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name: "STREAM_ERROR_MODE",
            value,
         })?,
         None => StreamErrorMode::default(),
      };

      Ok(Self {
         host: get("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
         port,
         supabase_url: get("SUPABASE_URL"),
         supabase_key: get("SUPABASE_KEY"),
         mistral_api_key: get("MISTRAL_API_KEY"),
         mistral_model: get("MISTRAL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
         mistral_base_url: get("MISTRAL_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
         stream_error_mode,
      })
   }
}

//! # OpenAPI YAML 生成ツール
//!
//! ゲートウェイの Rust 型から OpenAPI 仕様を YAML 形式で標準出力に出力する。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p venturelens-gateway > openapi/openapi.yaml
//! ```

use utoipa::OpenApi;
use venturelens_gateway::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
   let yaml = ApiDoc::openapi()
      .to_yaml()
      .map_err(|e| anyhow::anyhow!("OpenAPI YAML 生成に失敗しました: {e}"))?;
   print!("{yaml}");
   Ok(())
}

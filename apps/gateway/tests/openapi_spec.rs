//! # OpenAPI 仕様テスト
//!
//! utoipa から生成される OpenAPI 仕様に全エンドポイントとスキーマが
//! 含まれていることを検証する。

use utoipa::OpenApi;
use venturelens_gateway::openapi::ApiDoc;

#[test]
fn test_openapi仕様がパニックせず生成される() {
   let doc = ApiDoc::openapi();
   // パニックしなければ成功
   let _yaml = doc.to_yaml().unwrap();
}

#[test]
fn test_全パスが含まれている() {
   let doc = ApiDoc::openapi();
   let paths: Vec<&str> = doc.paths.paths.keys().map(|k| k.as_str()).collect();

   assert_eq!(paths.len(), 7, "パス数が 7 であること: {paths:?}");

   assert!(paths.contains(&"/"));
   assert!(paths.contains(&"/health"));
   assert!(paths.contains(&"/health/ready"));
   assert!(paths.contains(&"/signup"));
   assert!(paths.contains(&"/login"));
   assert!(paths.contains(&"/validate-idea"));
   assert!(paths.contains(&"/stream-validate-idea"));
}

#[test]
fn test_全タグが含まれている() {
   let doc = ApiDoc::openapi();
   let tags: Vec<&str> = doc
      .tags
      .as_ref()
      .expect("tags が存在すること")
      .iter()
      .map(|t| t.name.as_str())
      .collect();

   assert_eq!(tags, vec!["health", "auth", "analysis"]);
}

#[test]
fn test_分析結果とエラーのスキーマが登録されている() {
   let doc = ApiDoc::openapi();
   let components = doc.components.as_ref().expect("components が存在すること");

   for name in [
      "StartupAnalysis",
      "MonetizationStrategy",
      "SimilarStartup",
      "RiskFactor",
      "ErrorResponse",
      "SignUpResult",
      "IdeaRequest",
      "CredentialsRequest",
   ] {
      assert!(
         components.schemas.contains_key(name),
         "{name} スキーマが存在すること"
      );
   }
}

#[test]
fn test_分析結果スキーマの必須キーが5つ() {
   let doc = ApiDoc::openapi();
   let json = serde_json::to_value(&doc).unwrap();

   let required = json["components"]["schemas"]["StartupAnalysis"]["required"]
      .as_array()
      .expect("required が存在すること");
   assert_eq!(required.len(), 5);
}

#[test]
fn test_リクエストボディのスキーマに必須フィールドが記載される() {
   let doc = ApiDoc::openapi();
   let json = serde_json::to_value(&doc).unwrap();
   let schemas = &json["components"]["schemas"];

   assert_eq!(
      schemas["CredentialsRequest"]["required"],
      serde_json::json!(["email", "password"])
   );
   assert_eq!(schemas["IdeaRequest"]["required"], serde_json::json!(["idea"]));
}

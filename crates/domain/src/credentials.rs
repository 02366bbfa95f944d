//! # 認証情報
//!
//! サインアップ・ログインで認証プロバイダへ転送するメールアドレスとパスワード。
//! ゲートウェイはこれを保存せず、検証後そのまま転送する。

use serde::Serialize;

use crate::DomainError;

/// 必須フィールド欠落時のメッセージ
pub const CREDENTIALS_REQUIRED_MESSAGE: &str = "Email and password are required.";

/// 認証情報（値オブジェクト）
///
/// # 不変条件
///
/// - `email` と `password` はいずれも空でない
///
/// # セキュリティ
///
/// Debug 出力ではパスワードの値をマスクする。
#[derive(Clone, Serialize)]
pub struct Credentials {
   email:    String,
   password: String,
}

impl std::fmt::Debug for Credentials {
   fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
      f.debug_struct("Credentials")
         .field("email", &self.email)
         .field("password", &"[REDACTED]")
         .finish()
   }
}

impl Credentials {
   /// 認証情報を作成する
   ///
   /// # Errors
   ///
   /// どちらかが空文字列の場合は [`DomainError::Validation`]。
   pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, DomainError> {
      let email = email.into();
      let password = password.into();
      if email.is_empty() || password.is_empty() {
         return Err(DomainError::Validation(CREDENTIALS_REQUIRED_MESSAGE.to_string()));
      }
      Ok(Self { email, password })
   }

   /// 任意の JSON 値から認証情報を取り出す
   ///
   /// オブジェクトでない、キーが無い、文字列でない、空文字列のいずれも
   /// 「必須フィールドの欠落」として扱う。
   pub fn from_json(body: &serde_json::Value) -> Result<Self, DomainError> {
      let field = |key: &str| body.get(key).and_then(serde_json::Value::as_str);
      match (field("email"), field("password")) {
         (Some(email), Some(password)) => Self::new(email, password),
         _ => Err(DomainError::Validation(CREDENTIALS_REQUIRED_MESSAGE.to_string())),
      }
   }

   pub fn email(&self) -> &str {
      &self.email
   }

   pub fn password(&self) -> &str {
      &self.password
   }
}

#[cfg(test)]
mod tests {
   use pretty_assertions::assert_eq;
   use rstest::rstest;
   use serde_json::json;

   use super::*;

   #[test]
   fn test_from_json_両方揃っていれば成功する() {
      let credentials =
         Credentials::from_json(&json!({"email": "a@example.com", "password": "secret"})).unwrap();

      assert_eq!(credentials.email(), "a@example.com");
      assert_eq!(credentials.password(), "secret");
   }

   #[rstest]
   #[case::email欠落(json!({"password": "secret"}))]
   #[case::password欠落(json!({"email": "a@example.com"}))]
   #[case::email空文字列(json!({"email": "", "password": "secret"}))]
   #[case::password空文字列(json!({"email": "a@example.com", "password": ""}))]
   #[case::文字列以外(json!({"email": 123, "password": "secret"}))]
   #[case::null(json!({"email": null, "password": "secret"}))]
   #[case::オブジェクト以外(json!(["a@example.com", "secret"]))]
   #[case::空オブジェクト(json!({}))]
   fn test_from_json_欠落や空はvalidationエラー(#[case] body: serde_json::Value) {
      let error = Credentials::from_json(&body).unwrap_err();

      assert_eq!(error.client_message(), "Email and password are required.");
   }

   #[test]
   fn test_debug出力でパスワードがマスクされる() {
      let credentials = Credentials::new("a@example.com", "super-secret").unwrap();

      let debug = format!("{credentials:?}");

      assert!(debug.contains("a@example.com"));
      assert!(debug.contains("[REDACTED]"));
      assert!(!debug.contains("super-secret"));
   }

   #[test]
   fn test_serializeで転送用のjsonになる() {
      let credentials = Credentials::new("a@example.com", "secret").unwrap();

      assert_eq!(
         serde_json::to_value(&credentials).unwrap(),
         json!({"email": "a@example.com", "password": "secret"})
      );
   }
}

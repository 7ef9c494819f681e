//! Authentication payloads and user records.

use serde::{Deserialize, Serialize};

use super::directory::EntrepreneurBasic;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
  pub username: String,
  pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
  #[serde(rename = "nombre")]
  pub first_name: String,
  #[serde(rename = "apellido")]
  pub last_name: String,
  pub username: String,
  pub email: String,
  pub password: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub roles: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
  pub token: String,
  #[serde(rename = "tokenType", default = "default_token_type")]
  pub token_type: String,
  pub id: i64,
  pub username: String,
  pub email: String,
  #[serde(default)]
  pub roles: Vec<String>,
}

fn default_token_type() -> String {
  "Bearer".to_string()
}

impl From<&AuthResponse> for Session {
  fn from(auth: &AuthResponse) -> Self {
    Session {
      token: auth.token.clone(),
      token_type: auth.token_type.clone(),
      user_id: Some(auth.id),
      username: Some(auth.username.clone()),
      email: Some(auth.email.clone()),
      roles: auth.roles.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBasic {
  pub id: i64,
  #[serde(rename = "nombre", default)]
  pub first_name: String,
  #[serde(rename = "apellido", default)]
  pub last_name: String,
  pub username: String,
  #[serde(default)]
  pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: i64,
  #[serde(rename = "nombre", default)]
  pub first_name: String,
  #[serde(rename = "apellido", default)]
  pub last_name: String,
  pub username: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub roles: Vec<String>,
  #[serde(rename = "emprendedor", default)]
  pub entrepreneur: Option<EntrepreneurBasic>,
}

use serde::{Deserialize, Serialize};

use super::directory::EntrepreneurBasic;
use super::user::UserBasic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
  #[default]
  #[serde(rename = "TEXTO")]
  Text,
  #[serde(rename = "IMAGEN")]
  Image,
  #[serde(rename = "ARCHIVO")]
  File,
  #[serde(rename = "UBICACION")]
  Location,
  #[serde(rename = "SISTEMA")]
  System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
  pub id: i64,
  #[serde(rename = "contenido")]
  pub content: String,
  #[serde(rename = "fechaEnvio")]
  pub sent_at: String,
  #[serde(rename = "leido", default)]
  pub read: bool,
  #[serde(rename = "tipoMensaje", default)]
  pub kind: MessageKind,
  #[serde(rename = "emisor")]
  pub sender: UserBasic,
  #[serde(rename = "conversacionId")]
  pub conversation_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
  pub id: i64,
  #[serde(rename = "usuarioId")]
  pub user_id: i64,
  #[serde(rename = "emprendedorId")]
  pub entrepreneur_id: i64,
  #[serde(rename = "reservaCarritoId", default)]
  pub cart_reservation_id: Option<i64>,
  #[serde(rename = "fechaCreacion", default)]
  pub created_at: String,
  #[serde(rename = "ultimoMensaje", default)]
  pub last_message: Option<Message>,
  #[serde(rename = "mensajesNoLeidos", default)]
  pub unread: u32,
  #[serde(rename = "emprendedor")]
  pub entrepreneur: EntrepreneurBasic,
  #[serde(rename = "usuario")]
  pub user: UserBasic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRequest {
  #[serde(rename = "conversacionId")]
  pub conversation_id: i64,
  #[serde(rename = "contenido")]
  pub content: String,
  #[serde(rename = "tipoMensaje")]
  pub kind: MessageKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartConversationRequest {
  #[serde(rename = "emprendedorId")]
  pub entrepreneur_id: i64,
  #[serde(rename = "mensaje")]
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickMessageRequest {
  #[serde(rename = "mensaje")]
  pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnreadCount {
  #[serde(rename = "cantidadNoLeidos")]
  pub count: u32,
}

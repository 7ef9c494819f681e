use tracing::info;

use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::error::Error;
use crate::models::{
  Conversation, Message, MessageRequest, QuickMessageRequest, StartConversationRequest,
  UnreadCount,
};

#[derive(Clone)]
pub struct ChatRepository {
  api: ApiClient,
}

fn non_empty(text: &str) -> Result<(), Error> {
  if text.trim().is_empty() {
    return Err(Error::InvalidInput(
      "El mensaje no puede estar vacío".to_string(),
    ));
  }
  Ok(())
}

impl ChatRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn conversations(&self) -> ResourceStream<Vec<Conversation>> {
    let api = self.api.clone();
    observe(async move { api.get("chat/conversaciones").await })
  }

  pub fn by_reservation(&self, cart_reservation_id: i64) -> ResourceStream<Vec<Conversation>> {
    let api = self.api.clone();
    observe(async move {
      api
        .get(&format!(
          "chat/reserva-carrito/{}/conversaciones",
          cart_reservation_id
        ))
        .await
    })
  }

  pub fn unread(&self) -> ResourceStream<UnreadCount> {
    let api = self.api.clone();
    observe(async move { api.get("chat/mensajes-no-leidos").await })
  }

  pub fn send(&self, request: MessageRequest) -> ResourceStream<Message> {
    let api = self.api.clone();
    observe(async move {
      non_empty(&request.content)?;
      let message: Message = api.post("chat/mensaje", &request).await?;
      info!(conversation = request.conversation_id, "message sent");
      Ok(message)
    })
  }

  pub fn start(&self, request: StartConversationRequest) -> ResourceStream<Conversation> {
    let api = self.api.clone();
    observe(async move {
      non_empty(&request.message)?;
      let conversation: Conversation = api
        .post("chat/conversacion/iniciar-carrito", &request)
        .await?;
      info!(id = conversation.id, entrepreneur = request.entrepreneur_id, "conversation started");
      Ok(conversation)
    })
  }

  /// Message every entrepreneur involved in a cart reservation at once.
  pub fn quick_message(&self, cart_reservation_id: i64, message: &str) -> ResourceStream<Vec<Message>> {
    let api = self.api.clone();
    let body = QuickMessageRequest {
      message: message.to_string(),
    };
    observe(async move {
      non_empty(&body.message)?;
      let sent: Vec<Message> = api
        .post(
          &format!("chat/reserva-carrito/{}/mensaje-rapido", cart_reservation_id),
          &body,
        )
        .await?;
      info!(cart_reservation_id, count = sent.len(), "quick message sent");
      Ok(sent)
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::MessageKind;
  use crate::repository::testing::{api_for, unreachable_api};
  use crate::repository::Resource;
  use futures::StreamExt;
  use httpmock::prelude::*;
  use serde_json::json;

  #[tokio::test]
  async fn unread_count_decodes() {
    let server = MockServer::start_async().await;
    server
      .mock_async(|when, then| {
        when.method(GET).path("/api/chat/mensajes-no-leidos");
        then.status(200).json_body(json!({ "cantidadNoLeidos": 3 }));
      })
      .await;

    let repo = ChatRepository::new(api_for(&server));
    let states: Vec<_> = repo.unread().collect().await;
    assert_eq!(states[1].data().map(|c| c.count), Some(3));
  }

  #[tokio::test]
  async fn blank_message_is_rejected_locally() {
    let repo = ChatRepository::new(unreachable_api());
    let request = MessageRequest {
      conversation_id: 1,
      content: "   ".to_string(),
      kind: MessageKind::Text,
    };
    let states: Vec<_> = repo.send(request).collect().await;
    assert_eq!(
      states[1],
      Resource::Error("El mensaje no puede estar vacío".to_string())
    );
  }

  #[tokio::test]
  async fn quick_message_posts_body() {
    let server = MockServer::start_async().await;
    let mock = server
      .mock_async(|when, then| {
        when
          .method(POST)
          .path("/api/chat/reserva-carrito/5/mensaje-rapido")
          .json_body(json!({ "mensaje": "Llegamos a las 9" }));
        then.status(200).json_body(json!([]));
      })
      .await;

    let repo = ChatRepository::new(api_for(&server));
    let states: Vec<_> = repo.quick_message(5, "Llegamos a las 9").collect().await;

    assert_eq!(states[1], Resource::Success(vec![]));
    mock.assert_async().await;
  }
}

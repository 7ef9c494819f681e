use crate::models::{
  Conversation, Message, MessageRequest, StartConversationRequest, UnreadCount,
};
use crate::repository::ChatRepository;
use crate::state::StateSlot;

#[derive(Clone)]
pub struct ChatViewModel {
  repo: ChatRepository,
  pub conversations: StateSlot<Vec<Conversation>>,
  pub reservation_conversations: StateSlot<Vec<Conversation>>,
  pub unread: StateSlot<UnreadCount>,
  pub send: StateSlot<Message>,
  pub start: StateSlot<Conversation>,
  pub quick_message: StateSlot<Vec<Message>>,
}

impl ChatViewModel {
  pub fn new(repo: ChatRepository) -> Self {
    Self {
      repo,
      conversations: StateSlot::new(),
      reservation_conversations: StateSlot::new(),
      unread: StateSlot::new(),
      send: StateSlot::new(),
      start: StateSlot::new(),
      quick_message: StateSlot::new(),
    }
  }

  pub fn load_conversations(&self) {
    self.conversations.launch(self.repo.conversations());
  }

  pub fn load_for_reservation(&self, cart_reservation_id: i64) {
    self
      .reservation_conversations
      .launch(self.repo.by_reservation(cart_reservation_id));
  }

  pub fn load_unread(&self) {
    self.unread.launch(self.repo.unread());
  }

  pub fn send(&self, request: MessageRequest) {
    let vm = self.clone();
    self
      .send
      .launch_then(self.repo.send(request), move |_| vm.load_conversations());
  }

  pub fn start(&self, request: StartConversationRequest) {
    let vm = self.clone();
    self
      .start
      .launch_then(self.repo.start(request), move |_| vm.load_conversations());
  }

  pub fn quick_message(&self, cart_reservation_id: i64, message: &str) {
    let vm = self.clone();
    self.quick_message.launch_then(
      self.repo.quick_message(cart_reservation_id, message),
      move |_| vm.load_for_reservation(cart_reservation_id),
    );
  }

  pub fn clear_operations(&self) {
    self.send.clear();
    self.start.clear();
    self.quick_message.clear();
  }
}

use tracing::info;

use super::{observe, ResourceStream};
use crate::api::ApiClient;
use crate::models::{Category, CategoryRequest};

#[derive(Clone)]
pub struct CategoryRepository {
  api: ApiClient,
}

impl CategoryRepository {
  pub fn new(api: ApiClient) -> Self {
    Self { api }
  }

  pub fn get_all(&self) -> ResourceStream<Vec<Category>> {
    let api = self.api.clone();
    observe(async move { api.get("categorias").await })
  }

  pub fn get_by_id(&self, id: i64) -> ResourceStream<Category> {
    let api = self.api.clone();
    observe(async move { api.get(&format!("categorias/{}", id)).await })
  }

  pub fn create(&self, request: CategoryRequest) -> ResourceStream<Category> {
    let api = self.api.clone();
    observe(async move {
      let created: Category = api.post("categorias", &request).await?;
      info!(id = created.id, name = %created.name, "category created");
      Ok(created)
    })
  }

  pub fn update(&self, id: i64, request: CategoryRequest) -> ResourceStream<Category> {
    let api = self.api.clone();
    observe(async move { api.put(&format!("categorias/{}", id), &request).await })
  }

  pub fn delete(&self, id: i64) -> ResourceStream<()> {
    let api = self.api.clone();
    observe(async move {
      api.delete(&format!("categorias/{}", id)).await?;
      info!(id, "category deleted");
      Ok(())
    })
  }
}

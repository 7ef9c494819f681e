use reqwest::{Method, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::session::SessionContext;

/// JSON error payload returned by the backend on non-2xx responses
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
  message: Option<String>,
  mensaje: Option<String>,
  error: Option<String>,
}

/// REST client for the turismo backend.
///
/// Cheap to clone. The bearer token is read from the injected session on
/// every request, so logging in through one clone authenticates all of them.
#[derive(Clone)]
pub struct ApiClient {
  http: reqwest::Client,
  base_url: Url,
  session: SessionContext,
}

impl ApiClient {
  pub fn new(config: &ApiConfig, session: SessionContext) -> Result<Self> {
    Self::with_timeout(&config.base_url, config.timeout(), session)
  }

  pub fn with_timeout(base_url: &str, timeout: Duration, session: SessionContext) -> Result<Self> {
    // Url::join drops the last path segment unless the base ends with '/'
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };
    let base_url = Url::parse(&normalized)?;

    let http = reqwest::Client::builder()
      .timeout(timeout)
      .user_agent(concat!("turismo/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(Error::Network)?;

    Ok(Self {
      http,
      base_url,
      session,
    })
  }

  pub fn session(&self) -> &SessionContext {
    &self.session
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self.execute(self.request(Method::GET, path)?).await
  }

  pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
  where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::GET, path)?.query(query))
      .await
  }

  pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::POST, path)?.json(body))
      .await
  }

  pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::PUT, path)?.json(body))
      .await
  }

  /// PUT without a body, parameters in the query string.
  pub async fn put_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
  where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::PUT, path)?.query(query))
      .await
  }

  /// PUT without a body whose response is a plain-text confirmation.
  pub async fn put_text(&self, path: &str) -> Result<String> {
    self.execute_text(self.request(Method::PUT, path)?).await
  }

  pub async fn patch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self.execute(self.request(Method::PATCH, path)?).await
  }

  pub async fn patch_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
  where
    T: DeserializeOwned,
    Q: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::PATCH, path)?.query(query))
      .await
  }

  pub async fn patch_json<T, B>(&self, path: &str, body: &B) -> Result<T>
  where
    T: DeserializeOwned,
    B: Serialize + ?Sized,
  {
    self
      .execute(self.request(Method::PATCH, path)?.json(body))
      .await
  }

  /// DELETE whose success body is empty.
  pub async fn delete(&self, path: &str) -> Result<()> {
    let response = self.send(self.request(Method::DELETE, path)?).await?;
    // Drain the body so the connection can be reused
    let _ = response.bytes().await;
    Ok(())
  }

  /// DELETE that returns the updated resource (e.g. the cart).
  pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
    self.execute(self.request(Method::DELETE, path)?).await
  }

  pub async fn delete_text(&self, path: &str) -> Result<String> {
    self.execute_text(self.request(Method::DELETE, path)?).await
  }

  fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
    let url = self.base_url.join(path.trim_start_matches('/'))?;
    let mut builder = self.http.request(method, url);
    if let Some(auth) = self.session.bearer() {
      builder = builder.header(reqwest::header::AUTHORIZATION, auth);
    }
    Ok(builder)
  }

  async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response> {
    let response = builder.send().await?;
    let status = response.status();
    debug!(url = %response.url(), status = status.as_u16(), "api response");

    if status.is_success() {
      return Ok(response);
    }

    let body = response.bytes().await.unwrap_or_default();
    let message = error_message(status, &body);
    warn!(status = status.as_u16(), message = %message, "api error");
    Err(Error::Server {
      status: status.as_u16(),
      message,
    })
  }

  async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
    let response = self.send(builder).await?;
    let bytes = response.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
      return Err(Error::EmptyBody);
    }
    serde_json::from_slice(&bytes).map_err(Error::Decode)
  }

  async fn execute_text(&self, builder: RequestBuilder) -> Result<String> {
    let response = self.send(builder).await?;
    Ok(response.text().await?)
  }
}

/// Extract the human-readable message from an error response.
fn error_message(status: StatusCode, body: &[u8]) -> String {
  let parsed: ErrorBody = serde_json::from_slice(body).unwrap_or_default();
  parsed
    .message
    .or(parsed.mensaje)
    .or(parsed.error)
    .filter(|m| !m.trim().is_empty())
    .or_else(|| {
      // Some endpoints answer with a bare text message
      std::str::from_utf8(body)
        .ok()
        .map(str::trim)
        .filter(|t| !t.is_empty() && !t.starts_with('{'))
        .map(String::from)
    })
    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

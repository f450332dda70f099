//! REST client for the reservation service.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};

use super::ReservationSource;
use crate::{
    error::{ConsoleError, Result},
    models::{
        BatchRequest, BookingId, EditedFieldSet, Reservation, ReservationList, ReservationStatus,
        ServiceOrderResponse, StatusUpdate,
    },
};

/// Connection settings for [`HttpReservationSource`].
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Base URL the `/reservations` paths are appended to
    pub base_url: String,
    /// Sent as a bearer token when present
    pub token: Option<String>,
    pub timeout: Duration,
}

impl HttpSourceConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }
}

/// Reservation source backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpReservationSource {
    client: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpReservationSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let trimmed = config.base_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConsoleError::Configuration {
                message: "API base URL must not be empty".to_string(),
            });
        }
        let base_url = Url::parse(trimmed).map_err(|e| ConsoleError::Configuration {
            message: format!("Invalid API base URL '{trimmed}': {e}"),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::Configuration {
                message: format!("API base URL '{trimmed}' cannot hold a path"),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConsoleError::Configuration {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url,
            token: config.token,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Appends `segments` to the base URL, percent-encoding each one so an
    /// opaque booking id always stays a single segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ConsoleError::Configuration {
                message: format!("API base URL '{}' cannot hold a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder> {
        let url = self.endpoint(segments)?;
        debug!("{method} {url}");
        let builder = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, context: &str) -> Result<Response> {
        let response = builder
            .send()
            .await
            .map_err(|e| ConsoleError::network(context, e))?;
        check_status(response).await
    }

    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: &B,
        context: &str,
    ) -> Result<Response> {
        self.send(self.request(method, segments)?.json(body), context)
            .await
    }

    async fn parse<T: DeserializeOwned>(response: Response, context: &str) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConsoleError::network(context, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return serde_json::from_str("{}").map_err(ConsoleError::from);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Passes 2xx responses through and turns anything else into
/// [`ConsoleError::Server`] carrying the server's own message.
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = server_message(&body)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
    warn!("Reservation service answered {}: {}", status.as_u16(), message);
    Err(ConsoleError::Server {
        status: status.as_u16(),
        message,
    })
}

/// Message from an error body: `message`, `error` or `detail` when the body
/// is a JSON object, the trimmed body otherwise.
pub(crate) fn server_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(serde_json::Value::Object(map)) = serde_json::from_str(trimmed) {
        for key in ["message", "error", "detail"] {
            if let Some(serde_json::Value::String(text)) = map.get(key) {
                return Some(text.clone());
            }
        }
    }
    Some(trimmed.to_string())
}

#[async_trait]
impl ReservationSource for HttpReservationSource {
    async fn list_reservations(&self) -> Result<Vec<Reservation>> {
        let context = "Failed to list reservations";
        let response = self
            .send(self.request(Method::GET, &["reservations"])?, context)
            .await?;
        let list: ReservationList = Self::parse(response, context).await?;
        Ok(list.into())
    }

    async fn update_reservation(
        &self,
        booking_id: &BookingId,
        changes: &EditedFieldSet,
    ) -> Result<()> {
        let segments = ["reservations", booking_id.as_str()];
        self.send_json(Method::PUT, &segments, changes, "Failed to update reservation")
            .await?;
        Ok(())
    }

    async fn update_status(&self, booking_id: &BookingId, status: ReservationStatus) -> Result<()> {
        let segments = ["reservations", booking_id.as_str(), "status"];
        self.send_json(
            Method::PATCH,
            &segments,
            &StatusUpdate { status },
            "Failed to update reservation status",
        )
        .await?;
        Ok(())
    }

    async fn generate_service_orders(
        &self,
        booking_ids: &[BookingId],
    ) -> Result<ServiceOrderResponse> {
        let context = "Failed to generate service orders";
        let body = BatchRequest {
            reservation_ids: booking_ids.to_vec(),
        };
        let response = self
            .send_json(Method::POST, &["reservations", "service-orders"], &body, context)
            .await?;
        Self::parse(response, context).await
    }

    async fn send_confirmations(&self, booking_ids: &[BookingId]) -> Result<()> {
        let body = BatchRequest {
            reservation_ids: booking_ids.to_vec(),
        };
        self.send_json(
            Method::POST,
            &["reservations", "send-confirmations"],
            &body,
            "Failed to send confirmations",
        )
        .await?;
        Ok(())
    }
}

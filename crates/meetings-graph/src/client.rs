//! Microsoft Graph calendar client.
//!
//! Holds a bearer token obtained elsewhere and attaches it as
//! `Authorization: Bearer <token>` on every request. Token lifetime is the
//! caller's concern: an expired token surfaces as `AuthenticationFailed`.

use std::collections::HashSet;
use std::time::Duration;

use reqwest::Method;
use tracing::{debug, warn};
use url::Url;

use crate::error::{GraphError, GraphResult};
use crate::event::{Event, EventList};

/// Base URL for Microsoft Graph v1.0.
pub const GRAPH_API_BASE: &str = "https://graph.microsoft.com/v1.0";

/// Calendar event client bound to one access token.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http_client: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl GraphClient {
    /// Creates a client for the public Graph endpoint.
    pub fn new(access_token: impl Into<String>, timeout: Duration) -> GraphResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                GraphError::configuration(format!("failed to create HTTP client: {}", e))
                    .with_source(e)
            })?;

        Ok(Self {
            http_client,
            access_token: access_token.into(),
            base_url: GRAPH_API_BASE.to_string(),
        })
    }

    /// Points the client at another Graph-compatible base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> GraphResult<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| {
            GraphError::configuration(format!("invalid base URL {}: {}", base_url, e))
                .with_source(e)
        })?;
        self.base_url = base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Lists the signed-in user's events, following `@odata.nextLink` pages.
    ///
    /// Requires `Calendars.Read`. Paging stops at the first link that was
    /// already fetched.
    pub async fn list_events(&self) -> GraphResult<Vec<Event>> {
        let mut events = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(self.events_url());

        while let Some(url) = next {
            let body = self.request(Method::GET, &url, None, 200).await?;
            let page: EventList = parse(&body)?;
            events.extend(page.value);
            visited.insert(url);

            next = page.next_link;
            if let Some(ref link) = next
                && visited.contains(link)
            {
                warn!("next page link {} was already fetched, stopping", link);
                break;
            }
        }

        debug!("fetched {} events", events.len());
        Ok(events)
    }

    /// Reads one event. Requires `Calendars.Read`.
    pub async fn get_event(&self, event_id: &str) -> GraphResult<Event> {
        let body = self
            .request(Method::GET, &self.event_url(event_id), None, 200)
            .await?;
        parse(&body)
    }

    /// Creates an event and returns it as stored, including its `id`.
    ///
    /// Requires `Calendars.ReadWrite`.
    pub async fn create_event(&self, event: &Event) -> GraphResult<Event> {
        let body = self
            .request(Method::POST, &self.events_url(), Some(event), 201)
            .await?;
        let created: Event = parse(&body)?;
        debug!(id = created.id.as_deref().unwrap_or_default(), "created event");
        Ok(created)
    }

    /// Patches the fields set on `event`. Requires `Calendars.ReadWrite`.
    pub async fn update_event(&self, event_id: &str, event: &Event) -> GraphResult<Event> {
        let body = self
            .request(Method::PATCH, &self.event_url(event_id), Some(event), 200)
            .await?;
        parse(&body)
    }

    /// Deletes an event. Requires `Calendars.ReadWrite`.
    pub async fn delete_event(&self, event_id: &str) -> GraphResult<()> {
        self.request(Method::DELETE, &self.event_url(event_id), None, 204)
            .await?;
        debug!(id = event_id, "deleted event");
        Ok(())
    }

    fn events_url(&self) -> String {
        format!("{}/me/events", self.base_url)
    }

    fn event_url(&self, event_id: &str) -> String {
        format!("{}/me/events/{}", self.base_url, urlencoding::encode(event_id))
    }

    /// Sends one request and returns the body when the status matches
    /// `expected`.
    async fn request(
        &self,
        method: Method,
        url: &str,
        payload: Option<&Event>,
        expected: u16,
    ) -> GraphResult<String> {
        let mut request = self
            .http_client
            .request(method.clone(), url)
            .bearer_auth(&self.access_token);

        if let Some(event) = payload {
            request = request.json(event);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            GraphError::network(format!("failed to read response: {}", e)).with_source(e)
        })?;

        debug!(%method, status, "graph request to {}", url);
        if status != expected {
            return Err(GraphError::from_status(status, &body));
        }
        Ok(body)
    }
}

fn parse<T: serde::de::DeserializeOwned>(body: &str) -> GraphResult<T> {
    serde_json::from_str(body).map_err(|e| {
        GraphError::invalid_response(format!("failed to parse response: {}", e)).with_source(e)
    })
}

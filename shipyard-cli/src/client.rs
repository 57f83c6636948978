//! HTTP client for the Shipyard ship registry.

use crate::CliResult;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shipyard_core::{Ship, ShipCriteria, ShipOrder, ShipPayload};
use std::fmt;

/// Default base URL of the Shipyard server.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Sorting and paging sent alongside list filters.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    /// Sort key.
    pub order: ShipOrder,
    /// Zero-based page index.
    pub page_number: u32,
    /// Ships per page.
    pub page_size: u32,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Non-success response from the server.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Server-provided message, or the raw body when it is not JSON.
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "server returned {}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Normalize the server URL for consistent API requests.
fn normalize_server_url(server_url: &str) -> CliResult<String> {
    let trimmed = server_url.trim();
    if trimmed.is_empty() {
        return Err("server url is required".into());
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Reqwest-backed client for `/ships` endpoints.
#[derive(Debug, Clone)]
pub struct ShipClient {
    client: Client,
    base_url: String,
}

impl ShipClient {
    /// Build a client against `server_url`.
    pub fn new(server_url: &str) -> CliResult<Self> {
        let client = Client::builder().user_agent("shipyard-cli").build()?;
        Ok(Self {
            client,
            base_url: normalize_server_url(server_url)?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send(request: RequestBuilder) -> CliResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|err| err.message)
            .unwrap_or(body);
        Err(Box::new(ApiError {
            status: status.as_u16(),
            message,
        }))
    }

    async fn json<T: DeserializeOwned>(request: RequestBuilder) -> CliResult<T> {
        Ok(Self::send(request).await?.json::<T>().await?)
    }

    /// Fetch one page of ships matching `criteria`.
    pub async fn list(&self, criteria: &ShipCriteria, page: PageQuery) -> CliResult<Vec<Ship>> {
        let request = self
            .client
            .get(self.url("/ships"))
            .query(criteria)
            .query(&page);
        Self::json(request).await
    }

    /// Count ships matching `criteria`.
    pub async fn count(&self, criteria: &ShipCriteria) -> CliResult<u64> {
        let request = self.client.get(self.url("/ships/count")).query(criteria);
        Self::json(request).await
    }

    /// Fetch one ship by its raw identifier.
    pub async fn get(&self, id: &str) -> CliResult<Ship> {
        Self::json(self.client.get(self.url(&format!("/ships/{id}")))).await
    }

    /// Create a ship.
    pub async fn create(&self, payload: &ShipPayload) -> CliResult<Ship> {
        Self::json(self.client.post(self.url("/ships")).json(payload)).await
    }

    /// Apply a partial update to a ship.
    pub async fn update(&self, id: &str, payload: &ShipPayload) -> CliResult<Ship> {
        let request = self
            .client
            .post(self.url(&format!("/ships/{id}")))
            .json(payload);
        Self::json(request).await
    }

    /// Delete a ship.
    pub async fn delete(&self, id: &str) -> CliResult<()> {
        Self::send(self.client.delete(self.url(&format!("/ships/{id}")))).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiError, PageQuery, ShipClient, normalize_server_url};
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use serde_json::json;
    use shipyard_core::{ShipCriteria, ShipOrder, ShipPayload, ShipType};

    fn ship_body(id: i64) -> serde_json::Value {
        json!({
            "id": id,
            "name": "Voyager",
            "planet": "Neptune",
            "shipType": "TRANSPORT",
            "prodDate": 32_787_878_400_000_i64,
            "used": false,
            "speed": 0.55,
            "crewSize": 12,
            "rating": 4.0
        })
    }

    #[test]
    fn normalize_server_url_trims_trailing_slash() {
        assert_eq!(
            normalize_server_url(" http://localhost:8080/ ").expect("url"),
            "http://localhost:8080"
        );
        assert!(normalize_server_url("  ").is_err());
    }

    #[tokio::test]
    async fn list_sends_filters_and_paging() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/ships")
                    .query_param("planet", "Nep")
                    .query_param("shipType", "TRANSPORT")
                    .query_param("minSpeed", "0.5")
                    .query_param("order", "SPEED")
                    .query_param("pageNumber", "2")
                    .query_param("pageSize", "5");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!([ship_body(11)]));
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let criteria = ShipCriteria {
            planet: Some("Nep".to_string()),
            ship_type: Some(ShipType::Transport),
            min_speed: Some(0.5),
            ..ShipCriteria::default()
        };
        let page = PageQuery {
            order: ShipOrder::Speed,
            page_number: 2,
            page_size: 5,
        };
        let ships = client.list(&criteria, page).await.expect("list");

        mock.assert_async().await;
        assert_eq!(ships.len(), 1);
        assert_eq!(ships[0].id, 11);
        assert_eq!(ships[0].ship_type, ShipType::Transport);
    }

    #[tokio::test]
    async fn count_reads_bare_number() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ships/count").query_param("isUsed", "true");
                then.status(200)
                    .header("content-type", "application/json")
                    .body("42");
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let criteria = ShipCriteria {
            is_used: Some(true),
            ..ShipCriteria::default()
        };
        assert_eq!(client.count(&criteria).await.expect("count"), 42);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn create_posts_payload_without_absent_fields() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/ships")
                    .json_body(json!({ "name": "Voyager", "speed": 0.55 }));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(ship_body(1));
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let payload = ShipPayload {
            name: Some("Voyager".to_string()),
            speed: Some(0.55),
            ..ShipPayload::default()
        };
        let ship = client.create(&payload).await.expect("create");
        mock.assert_async().await;
        assert_eq!(ship.rating, 4.0);
    }

    #[tokio::test]
    async fn error_responses_surface_server_message() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/ships/77");
                then.status(404)
                    .header("content-type", "application/json")
                    .json_body(json!({ "message": "ship 77 not found" }));
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let err = client.get("77").await.unwrap_err();
        mock.assert_async().await;
        let api = err.downcast_ref::<ApiError>().expect("api error");
        assert_eq!(api.status, 404);
        assert_eq!(api.message, "ship 77 not found");
    }

    #[tokio::test]
    async fn update_and_delete_hit_ship_path() {
        let server = MockServer::start_async().await;
        let update = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/ships/3")
                    .json_body(json!({ "crewSize": 20 }));
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(ship_body(3));
            })
            .await;
        let delete = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/ships/3");
                then.status(200);
            })
            .await;

        let client = ShipClient::new(&server.base_url()).expect("client");
        let payload = ShipPayload {
            crew_size: Some(20),
            ..ShipPayload::default()
        };
        assert_eq!(client.update("3", &payload).await.expect("update").id, 3);
        client.delete("3").await.expect("delete");
        update.assert_async().await;
        delete.assert_async().await;
    }
}

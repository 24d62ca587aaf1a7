use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::bundle::{Customer, QuotationBundle, Quote, QuoteItem};
use crate::error::FetchError;

/// The read side the quotation service depends on: given a quote id, produce
/// the bundle the composer renders.
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn fetch_bundle(&self, quote_id: &str) -> Result<QuotationBundle, FetchError>;
}

/// A `QuoteRepository` backed by a Supabase PostgREST endpoint. Three queries
/// per bundle: the quote row, its customer row and the selected items sorted
/// by room name then item name.
pub struct SupabaseRepository {
    base_url: String,
    service_role_key: String,
    client: Client,
}

impl SupabaseRepository {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        SupabaseRepository {
            base_url,
            service_role_key: service_role_key.into(),
            client: Client::new(),
        }
    }

    /// Fetches exactly one row. PostgREST answers 406 when the filter does
    /// not match a single row, which maps to `NotFound`.
    async fn fetch_single<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
        entity: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        log::debug!("Fetching a single {entity} row from {url}");
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .header("Accept", "application/vnd.pgrst.object+json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_ACCEPTABLE {
            return Err(FetchError::NotFound(entity.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        log::debug!("Fetching rows from {url}");
        let response = self
            .client
            .get(&url)
            .query(query)
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl QuoteRepository for SupabaseRepository {
    async fn fetch_bundle(&self, quote_id: &str) -> Result<QuotationBundle, FetchError> {
        let quote: Quote = self
            .fetch_single("quotes", &[("id", format!("eq.{quote_id}"))], "quote")
            .await?;
        let customer: Customer = self
            .fetch_single(
                "customers",
                &[("id", format!("eq.{}", quote.customer_id))],
                "customer",
            )
            .await?;
        let items: Vec<QuoteItem> = self
            .fetch_rows(
                "quote_items",
                &[
                    ("quote_id", format!("eq.{quote_id}")),
                    ("is_selected", "eq.true".to_string()),
                    ("order", "room_name.asc,item_name.asc".to_string()),
                ],
            )
            .await?;
        log::debug!("Found {} selected items for quote {quote_id}", items.len());

        Ok(QuotationBundle::from_rows(customer, quote, items))
    }
}

/// An in-memory `QuoteRepository`, used by the service tests.
#[derive(Default)]
pub struct InMemoryRepository {
    bundles: HashMap<String, QuotationBundle>,
}

impl InMemoryRepository {
    pub fn with_bundle(bundle: QuotationBundle) -> Self {
        let mut bundles = HashMap::new();
        bundles.insert(bundle.quote.id.clone(), bundle);
        InMemoryRepository { bundles }
    }
}

#[async_trait]
impl QuoteRepository for InMemoryRepository {
    async fn fetch_bundle(&self, quote_id: &str) -> Result<QuotationBundle, FetchError> {
        self.bundles
            .get(quote_id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound("quote".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn quote_body() -> serde_json::Value {
        json!({
            "id": "q-1",
            "customer_id": "c-1",
            "quote_date": "2025-03-05"
        })
    }

    #[tokio::test]
    async fn fetches_and_groups_a_full_bundle() {
        let server = MockServer::start_async().await;

        let quote_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/quotes")
                .query_param("id", "eq.q-1")
                .header("apikey", "secret")
                .header("Accept", "application/vnd.pgrst.object+json");
            then.status(200).json_body(quote_body());
        });
        let customer_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/customers")
                .query_param("id", "eq.c-1");
            then.status(200).json_body(json!({
                "name": "A. Sharma",
                "phone": "9999999999",
                "alternate_phone": null,
                "address": "12 MG Road"
            }));
        });
        let items_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/quote_items")
                .query_param("quote_id", "eq.q-1")
                .query_param("is_selected", "eq.true")
                .query_param("order", "room_name.asc,item_name.asc");
            then.status(200).json_body(json!([
                {
                    "room_name": "Kitchen",
                    "item_name": "Modular Cabinet",
                    "description": "Soft-close hinges",
                    "quantity": 2,
                    "is_selected": true
                },
                {
                    "room_name": "Living Room",
                    "item_name": "Sofa",
                    "description": null,
                    "quantity": null,
                    "is_selected": true
                }
            ]));
        });

        let repository = SupabaseRepository::new(server.base_url(), "secret");
        let bundle = repository.fetch_bundle("q-1").await.unwrap();

        quote_mock.assert();
        customer_mock.assert();
        items_mock.assert();
        assert_eq!(bundle.customer.name, "A. Sharma");
        assert_eq!(bundle.selected_item_count(), 2);
        let rooms: Vec<&str> = bundle.items_by_room.keys().map(String::as_str).collect();
        assert_eq!(rooms, ["Kitchen", "Living Room"]);
    }

    #[tokio::test]
    async fn missing_quote_maps_to_not_found() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/quotes");
            then.status(406).body("JSON object requested, multiple (or no) rows returned");
        });

        let repository = SupabaseRepository::new(server.base_url(), "secret");
        let error = repository.fetch_bundle("missing").await.unwrap_err();
        assert!(matches!(error, FetchError::NotFound(entity) if entity == "quote"));
    }

    #[tokio::test]
    async fn upstream_failure_carries_status_and_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/quotes");
            then.status(500).body("database unavailable");
        });

        let repository = SupabaseRepository::new(server.base_url(), "secret");
        let error = repository.fetch_bundle("q-1").await.unwrap_err();
        match error {
            FetchError::Upstream { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "database unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn in_memory_repository_round_trips() {
        let bundle = QuotationBundle::from_rows(
            Customer {
                name: "A. Sharma".to_string(),
                phone: "9999999999".to_string(),
                alternate_phone: None,
                address: "12 MG Road".to_string(),
            },
            serde_json::from_value(quote_body()).unwrap(),
            Vec::new(),
        );
        let repository = InMemoryRepository::with_bundle(bundle);

        assert!(repository.fetch_bundle("q-1").await.is_ok());
        assert!(matches!(
            repository.fetch_bundle("q-2").await,
            Err(FetchError::NotFound(_))
        ));
    }
}

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{CredentialPair, OmsConfig};
use crate::oms::errors::OmsError;
use crate::oms::payloads;
use crate::oms::types::{InventoryRecord, InventorySearchResponse, PackArtifacts};
use crate::workflow::sku_map::SkuQuantityMap;

/// Custom credential headers expected by the order-management service.
pub const HEADER_AUTH_USERNAME: &str = "authUsername";
pub const HEADER_AUTH_PASSWORD: &str = "authPassword";

/// Order-management operations consumed by the workflow controller.
///
/// The trait seam exists so the controller can be driven against test
/// doubles; production code uses [`OmsClient`].
#[async_trait]
pub trait OmsApi {
    async fn search_inventories(
        &self,
        sku_codes: &[String],
    ) -> Result<Vec<InventoryRecord>, OmsError>;

    async fn create_outward_order(
        &self,
        order_code: &str,
        sku_map: &SkuQuantityMap,
    ) -> Result<(), OmsError>;

    async fn pack_order(
        &self,
        order_code: &str,
        sku_map: &SkuQuantityMap,
    ) -> Result<PackArtifacts, OmsError>;

    async fn handover_order(&self, order_code: &str) -> Result<(), OmsError>;
}

/// Thin synchronous-in-spirit client: one POST per operation, each call
/// awaited to completion before the session is allowed to move on. No
/// retries, no caching; a failure is reported to the operator as-is.
#[derive(Debug, Clone)]
pub struct OmsClient {
    http: reqwest::Client,
    config: OmsConfig,
}

impl OmsClient {
    /// Validate that every operation has a credential pair and build the
    /// client. Refusing here keeps credential problems out of the middle
    /// of a workflow.
    pub fn new(config: OmsConfig) -> Result<Self, OmsError> {
        for (operation, env_infix, pair) in [
            ("search inventory", "SEARCH", &config.credentials.search),
            ("create order", "CREATE_ORDER", &config.credentials.create_order),
            ("pack", "PACK", &config.credentials.pack),
            ("handover", "HANDOVER", &config.credentials.handover),
        ] {
            if !pair.is_complete() {
                return Err(OmsError::MissingCredentials { operation, env_infix });
            }
        }

        Ok(Self {
            http: reqwest::Client::new(),
            config,
        })
    }

    /// POST a JSON body with the operation's credential headers and return
    /// the response body text once the status is 2xx.
    async fn post_json<B: Serialize + Sync>(
        &self,
        operation: &'static str,
        url: &str,
        credentials: &CredentialPair,
        body: &B,
    ) -> Result<String, OmsError> {
        let username = credentials.username.as_deref().unwrap_or_default();
        let password = credentials.password.as_deref().unwrap_or_default();

        debug!(operation, url, "issuing order-management request");

        let response = self
            .http
            .post(url)
            .header(HEADER_AUTH_USERNAME, username)
            .header(HEADER_AUTH_PASSWORD, password)
            .json(body)
            .send()
            .await
            .map_err(|source| OmsError::Transport { operation, source })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| OmsError::Transport { operation, source })?;

        info!(operation, status = status.as_u16(), "order-management response");

        if !status.is_success() {
            return Err(OmsError::Api {
                operation,
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}

#[async_trait]
impl OmsApi for OmsClient {
    async fn search_inventories(
        &self,
        sku_codes: &[String],
    ) -> Result<Vec<InventoryRecord>, OmsError> {
        let operation = "search inventory";
        let request = payloads::inventory_search(&self.config.source_location_code, sku_codes);
        let body = self
            .post_json(operation, &self.config.search_url, &self.config.credentials.search, &request)
            .await?;

        let response: InventorySearchResponse = serde_json::from_str(&body)
            .map_err(|source| OmsError::Decode { operation, source })?;
        Ok(response.into_records())
    }

    async fn create_outward_order(
        &self,
        order_code: &str,
        sku_map: &SkuQuantityMap,
    ) -> Result<(), OmsError> {
        let order = payloads::outward_order(
            order_code,
            sku_map,
            &self.config.source_location_code,
            Utc::now(),
        );
        // Success body is ignored; only the status class matters here.
        self.post_json(
            "create order",
            &self.config.create_order_url,
            &self.config.credentials.create_order,
            &order,
        )
        .await?;
        Ok(())
    }

    async fn pack_order(
        &self,
        order_code: &str,
        sku_map: &SkuQuantityMap,
    ) -> Result<PackArtifacts, OmsError> {
        let operation = "pack";
        let request = payloads::pack_request(
            order_code,
            sku_map,
            &self.config.fulfillment_location_code,
            &self.config.channel_name,
        );
        let body = self
            .post_json(operation, &self.config.pack_url, &self.config.credentials.pack, &request)
            .await?;

        let artifacts: PackArtifacts = serde_json::from_str(&body)
            .map_err(|source| OmsError::Decode { operation, source })?;
        Ok(artifacts)
    }

    async fn handover_order(&self, order_code: &str) -> Result<(), OmsError> {
        let request = payloads::handover_request(
            order_code,
            &self.config.fulfillment_location_code,
            &self.config.channel_name,
        );
        self.post_json(
            "handover",
            &self.config.handover_url,
            &self.config.credentials.handover,
            &request,
        )
        .await?;
        Ok(())
    }
}

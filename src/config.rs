use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the fulfillment console.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FulfillmentConfig {
    /// Order-management service endpoints, locations and credentials.
    pub oms: OmsConfig,
    /// Workflow behaviour knobs.
    pub workflow: WorkflowConfig,
    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OmsConfig {
    /// Inventory search endpoint.
    pub search_url: String,
    /// Outward order creation endpoint.
    pub create_order_url: String,
    /// Pack endpoint.
    pub pack_url: String,
    /// Handover endpoint.
    pub handover_url: String,
    /// Source warehouse used for inventory and order creation.
    pub source_location_code: String,
    /// Fulfillment location used for pack and handover.
    pub fulfillment_location_code: String,
    /// Sales channel the orders belong to.
    pub channel_name: String,
    /// Per-operation credential pairs.
    #[serde(default)]
    pub credentials: OmsCredentials,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OmsCredentials {
    pub search: CredentialPair,
    pub create_order: CredentialPair,
    pub pack: CredentialPair,
    pub handover: CredentialPair,
}

/// One `authUsername`/`authPassword` pair. Usually supplied via env vars
/// (`OMS_SEARCH_AUTH_USERNAME`, ...) rather than the config file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialPair {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl CredentialPair {
    pub fn is_complete(&self) -> bool {
        matches!(
            (self.username.as_deref(), self.password.as_deref()),
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty()
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Pause between a successful pack and the handover request, allowing
    /// the external system to observe the pack. Not a timeout or retry.
    pub handover_delay_ms: u64,
    /// Reject the whole SKU:quantity input on the first malformed entry
    /// instead of silently dropping it.
    pub strict_sku_map: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is unset.
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format.
    pub json_logs: bool,
}

impl Default for FulfillmentConfig {
    fn default() -> Self {
        Self {
            oms: OmsConfig {
                search_url: "https://staging-common.omni.increff.com/assure-magic2/inventories"
                    .to_string(),
                create_order_url:
                    "https://staging-common.omni.increff.com/assure-magic2/orders/outward"
                        .to_string(),
                pack_url: "https://staging-common-assure.increff.com/assure-magic2/usp/order/pack"
                    .to_string(),
                handover_url:
                    "https://staging-common-assure.increff.com/assure-magic2/ewms/push/usp/handover/combined"
                        .to_string(),
                source_location_code: "WHBGN21".to_string(),
                fulfillment_location_code: "1992".to_string(),
                channel_name: "NOON".to_string(),
                credentials: OmsCredentials::default(),
            },
            workflow: WorkflowConfig {
                handover_delay_ms: 1500,
                strict_sku_map: false,
            },
            observability: ObservabilityConfig {
                log_level: "info".to_string(),
                json_logs: false,
            },
        }
    }
}

impl FulfillmentConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (fulfillment-console.toml)
    /// 3. Environment variables (prefixed with FULFILLMENT_)
    /// 4. Direct OMS_*_AUTH_* credential variables
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if Path::new("fulfillment-console.toml").exists() {
            builder = builder.add_source(File::with_name("fulfillment-console"));
        }

        builder = builder.add_source(
            Environment::with_prefix("FULFILLMENT")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut fulfillment_config: FulfillmentConfig = config.try_deserialize()?;
        fulfillment_config.apply_credential_env_overrides();

        Ok(fulfillment_config)
    }

    /// Credential pairs are usually injected through the environment; the
    /// handover pair falls back to the pack pair when not set separately,
    /// since most deployments share one set for both operations.
    fn apply_credential_env_overrides(&mut self) {
        let credentials = &mut self.oms.credentials;

        override_pair(&mut credentials.search, "OMS_SEARCH");
        override_pair(&mut credentials.create_order, "OMS_CREATE_ORDER");
        override_pair(&mut credentials.pack, "OMS_PACK");
        override_pair(&mut credentials.handover, "OMS_HANDOVER");

        if !credentials.handover.is_complete() && credentials.pack.is_complete() {
            credentials.handover = credentials.pack.clone();
        }
    }

    /// Save configuration to file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists.
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

fn override_pair(pair: &mut CredentialPair, env_prefix: &str) {
    if pair.username.is_none() {
        if let Ok(username) = std::env::var(format!("{env_prefix}_AUTH_USERNAME")) {
            pair.username = Some(username);
        }
    }
    if pair.password.is_none() {
        if let Ok(password) = std::env::var(format!("{env_prefix}_AUTH_PASSWORD")) {
            pair.password = Some(password);
        }
    }
}

// Fulfillment Console Library
// Exposes the workflow core for testing and integration

pub mod config;
pub mod oms;
pub mod render;
pub mod telemetry;
pub mod workflow;

// Re-export key types for easy access
pub use config::{CredentialPair, FulfillmentConfig, OmsConfig, OmsCredentials, WorkflowConfig};
pub use oms::{InventoryRecord, OmsApi, OmsClient, OmsError, PackArtifacts};
pub use render::render_session;
pub use telemetry::{generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use workflow::{
    FulfillmentController, FulfillmentError, FulfillmentEvent, FulfillmentMachine,
    FulfillmentPhase, MalformedEntryPolicy, SkuQuantityMap, TransitionError,
};

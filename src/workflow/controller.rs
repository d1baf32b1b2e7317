//! Fulfillment workflow controller.
//!
//! Owns the phase machine and mediates every call to the order-management
//! service. Each operation validates operator input, refuses to run outside
//! its phase, issues exactly one round of external calls, and feeds the
//! confirmed outcome back into the machine.

use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::WorkflowConfig;
use crate::oms::client::OmsApi;
use crate::oms::errors::OmsError;
use crate::oms::types::{InventoryRecord, PackArtifacts};
use crate::workflow::sku_map::{
    split_sku_list, MalformedEntryPolicy, SkuMapError, SkuQuantityMap,
};
use crate::workflow::state_machine::{
    FulfillmentEvent, FulfillmentMachine, FulfillmentPhase, TransitionError,
};

#[derive(Debug, Error)]
pub enum FulfillmentError {
    #[error("no SKU codes supplied")]
    EmptySkuList,

    #[error("no valid SKU:quantity entries in {input:?}")]
    EmptySkuMap { input: String },

    #[error("no order code supplied")]
    EmptyOrderCode,

    #[error(transparent)]
    SkuMap(#[from] SkuMapError),

    #[error("{action} is not available in the {phase} phase")]
    PhaseMismatch {
        action: &'static str,
        phase: FulfillmentPhase,
    },

    #[error("session has no created order or quantities to pack")]
    MissingOrder,

    #[error("no inventory available for the requested SKUs")]
    NoInventory,

    /// Pack succeeded but the handover was rejected: the session keeps the
    /// pack artifacts and stays in the pack-and-dispatch phase so the
    /// operator can retry (which re-packs).
    #[error("handover failed after a successful pack: {0}")]
    Handover(#[source] OmsError),

    #[error(transparent)]
    Oms(#[from] OmsError),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

pub struct FulfillmentController<C> {
    client: C,
    machine: FulfillmentMachine,
    handover_delay: Duration,
    malformed_entry_policy: MalformedEntryPolicy,
}

impl<C: OmsApi> FulfillmentController<C> {
    pub fn new(client: C, workflow: &WorkflowConfig) -> Self {
        Self {
            client,
            machine: FulfillmentMachine::new(),
            handover_delay: Duration::from_millis(workflow.handover_delay_ms),
            malformed_entry_policy: if workflow.strict_sku_map {
                MalformedEntryPolicy::Reject
            } else {
                MalformedEntryPolicy::Drop
            },
        }
    }

    /// Current session snapshot, for rendering.
    pub fn session(&self) -> &FulfillmentMachine {
        &self.machine
    }

    /// Clear the session back to the search phase. Available in any phase.
    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Look up inventory for a comma-separated SKU list at the source
    /// warehouse. At least one returned record moves the session to order
    /// creation; an empty result or a failed call leaves it in search.
    pub async fn search_inventory(
        &mut self,
        raw_skus: &str,
    ) -> Result<Vec<InventoryRecord>, FulfillmentError> {
        self.expect_phase(FulfillmentPhase::Search, "search inventory")?;

        let sku_codes = split_sku_list(raw_skus);
        if sku_codes.is_empty() {
            return Err(FulfillmentError::EmptySkuList);
        }

        let records = self.client.search_inventories(&sku_codes).await?;
        if records.is_empty() {
            warn!(skus = ?sku_codes, "inventory search returned no records");
            return Err(FulfillmentError::NoInventory);
        }

        info!(record_count = records.len(), "inventory available");
        self.machine.handle_event(FulfillmentEvent::InventoryFound {
            records: records.clone(),
        })?;
        Ok(records)
    }

    /// Create an outward order from a `SKU:QTY` mapping string and an
    /// operator-chosen order code. On acceptance the mapping and order code
    /// become the session's fixed order context.
    pub async fn create_order(
        &mut self,
        raw_map: &str,
        order_code: &str,
    ) -> Result<(), FulfillmentError> {
        self.expect_phase(FulfillmentPhase::OrderCreation, "create order")?;

        let order_code = order_code.trim();
        if order_code.is_empty() {
            return Err(FulfillmentError::EmptyOrderCode);
        }

        let sku_map = SkuQuantityMap::parse(raw_map, self.malformed_entry_policy)?;
        if sku_map.is_empty() {
            return Err(FulfillmentError::EmptySkuMap {
                input: raw_map.to_string(),
            });
        }

        self.client.create_outward_order(order_code, &sku_map).await?;

        info!(order_code, line_count = sku_map.len(), "outward order accepted");
        self.machine.handle_event(FulfillmentEvent::OrderAccepted {
            order_code: order_code.to_string(),
            sku_map,
        })?;
        Ok(())
    }

    /// Combined pack-then-handover action. The handover only runs after a
    /// successful pack, separated by the configured propagation delay. A
    /// handover failure keeps the pack artifacts visible in the session and
    /// leaves the dispatch flag unset; retrying re-packs the order.
    pub async fn pack_and_dispatch(&mut self) -> Result<PackArtifacts, FulfillmentError> {
        self.expect_phase(FulfillmentPhase::PackAndDispatch, "pack and dispatch")?;

        let order_code = match self.machine.order_code() {
            Some(code) if !self.machine.sku_map().is_empty() => code.to_string(),
            _ => return Err(FulfillmentError::MissingOrder),
        };
        let sku_map = self.machine.sku_map().clone();

        let artifacts = self.client.pack_order(&order_code, &sku_map).await?;
        self.machine.handle_event(FulfillmentEvent::PackCompleted {
            artifacts: artifacts.clone(),
        })?;

        // Give the external system time to observe the pack before asking
        // for the handover.
        tokio::time::sleep(self.handover_delay).await;

        if let Err(source) = self.client.handover_order(&order_code).await {
            warn!(order_code, "handover rejected; pack artifacts retained");
            return Err(FulfillmentError::Handover(source));
        }

        self.machine.handle_event(FulfillmentEvent::HandoverCompleted)?;
        info!(order_code, "order dispatched");
        Ok(artifacts)
    }

    fn expect_phase(
        &self,
        expected: FulfillmentPhase,
        action: &'static str,
    ) -> Result<(), FulfillmentError> {
        let phase = self.machine.phase();
        if phase != expected {
            return Err(FulfillmentError::PhaseMismatch { action, phase });
        }
        Ok(())
    }
}

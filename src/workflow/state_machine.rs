//! Phase state machine for one operator fulfillment session.
//!
//! The machine is the single owned session object: phase, inventory rows,
//! SKU mapping, order code, pack artifacts, dispatch flag. Phases only move
//! forward, and only when an event confirms that the corresponding external
//! call succeeded; the sole way back is an explicit reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::oms::types::{InventoryRecord, PackArtifacts};
use crate::workflow::sku_map::SkuQuantityMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentPhase {
    #[default]
    Search,
    OrderCreation,
    PackAndDispatch,
    Dispatched,
}

impl std::fmt::Display for FulfillmentPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FulfillmentPhase::Search => "search",
            FulfillmentPhase::OrderCreation => "order-creation",
            FulfillmentPhase::PackAndDispatch => "pack-and-dispatch",
            FulfillmentPhase::Dispatched => "dispatched",
        };
        f.write_str(name)
    }
}

/// Confirmed outcomes of external calls. Each event is only fed to the
/// machine after the corresponding request returned success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FulfillmentEvent {
    InventoryFound {
        records: Vec<InventoryRecord>,
    },
    OrderAccepted {
        order_code: String,
        sku_map: SkuQuantityMap,
    },
    /// Pack succeeded; artifacts recorded but the phase does not advance
    /// until the handover is confirmed as well.
    PackCompleted {
        artifacts: PackArtifacts,
    },
    HandoverCompleted,
    Reset,
}

#[derive(Debug, Error)]
pub enum TransitionError {
    #[error("event {event:?} is not valid in the {phase} phase")]
    InvalidTransition {
        phase: FulfillmentPhase,
        event: FulfillmentEvent,
    },
    #[error("handover confirmed before any pack result was recorded")]
    HandoverBeforePack,
}

/// Audit record for one accepted transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub from: FulfillmentPhase,
    pub to: FulfillmentPhase,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct FulfillmentMachine {
    phase: FulfillmentPhase,
    inventory: Vec<InventoryRecord>,
    sku_map: SkuQuantityMap,
    order_code: Option<String>,
    artifacts: Option<PackArtifacts>,
    dispatched: bool,
    history: Vec<TransitionRecord>,
}

impl FulfillmentMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> FulfillmentPhase {
        self.phase
    }

    pub fn inventory(&self) -> &[InventoryRecord] {
        &self.inventory
    }

    pub fn sku_map(&self) -> &SkuQuantityMap {
        &self.sku_map
    }

    pub fn order_code(&self) -> Option<&str> {
        self.order_code.as_deref()
    }

    pub fn artifacts(&self) -> Option<&PackArtifacts> {
        self.artifacts.as_ref()
    }

    /// Monotonic until reset: once true the combined pack-and-dispatch
    /// action is refused client-side.
    pub fn is_dispatched(&self) -> bool {
        self.dispatched
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    pub fn handle_event(&mut self, event: FulfillmentEvent) -> Result<(), TransitionError> {
        let phase = self.phase();

        match (phase, event) {
            (FulfillmentPhase::Search, FulfillmentEvent::InventoryFound { records }) => {
                self.inventory = records;
                self.advance(FulfillmentPhase::OrderCreation);
                Ok(())
            }
            (
                FulfillmentPhase::OrderCreation,
                FulfillmentEvent::OrderAccepted { order_code, sku_map },
            ) => {
                self.order_code = Some(order_code);
                self.sku_map = sku_map;
                self.advance(FulfillmentPhase::PackAndDispatch);
                Ok(())
            }
            (FulfillmentPhase::PackAndDispatch, FulfillmentEvent::PackCompleted { artifacts }) => {
                // No phase change: artifacts stay visible even if the
                // following handover fails.
                info!(
                    order_code = self.order_code.as_deref(),
                    "pack artifacts recorded"
                );
                self.artifacts = Some(artifacts);
                Ok(())
            }
            (FulfillmentPhase::PackAndDispatch, FulfillmentEvent::HandoverCompleted) => {
                if self.artifacts.is_none() {
                    return Err(TransitionError::HandoverBeforePack);
                }
                self.dispatched = true;
                self.advance(FulfillmentPhase::Dispatched);
                Ok(())
            }
            (_, FulfillmentEvent::Reset) => {
                self.apply_reset();
                Ok(())
            }
            (phase, event) => Err(TransitionError::InvalidTransition { phase, event }),
        }
    }

    /// Clear the whole session back to the search phase. Always available.
    pub fn reset(&mut self) {
        self.apply_reset();
    }

    fn advance(&mut self, to: FulfillmentPhase) {
        self.record_transition(self.phase, to);
        self.phase = to;
    }

    fn apply_reset(&mut self) {
        self.record_transition(self.phase, FulfillmentPhase::Search);
        self.phase = FulfillmentPhase::Search;
        self.inventory.clear();
        self.sku_map.clear();
        self.order_code = None;
        self.artifacts = None;
        self.dispatched = false;
    }

    fn record_transition(&mut self, from: FulfillmentPhase, to: FulfillmentPhase) {
        let record = TransitionRecord {
            from,
            to,
            at: Utc::now(),
        };

        info!(
            from = %record.from,
            to = %record.to,
            order_code = self.order_code.as_deref(),
            "fulfillment phase transition"
        );

        self.history.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::sku_map::MalformedEntryPolicy;

    fn records() -> Vec<InventoryRecord> {
        vec![InventoryRecord {
            channel_sku_code: "X1".to_string(),
            qc_pass_available_quantity: 10,
        }]
    }

    fn sku_map() -> SkuQuantityMap {
        SkuQuantityMap::parse("X1:2", MalformedEntryPolicy::Drop).unwrap()
    }

    fn artifacts() -> PackArtifacts {
        PackArtifacts {
            shipping_label_url: Some("L".to_string()),
            invoice_url: Some("I".to_string()),
        }
    }

    fn machine_at_pack_phase() -> FulfillmentMachine {
        let mut machine = FulfillmentMachine::new();
        machine
            .handle_event(FulfillmentEvent::InventoryFound { records: records() })
            .unwrap();
        machine
            .handle_event(FulfillmentEvent::OrderAccepted {
                order_code: "ORD-1".to_string(),
                sku_map: sku_map(),
            })
            .unwrap();
        machine
    }

    #[test]
    fn full_forward_progression() {
        let mut machine = machine_at_pack_phase();
        assert_eq!(machine.phase(), FulfillmentPhase::PackAndDispatch);
        assert_eq!(machine.order_code(), Some("ORD-1"));

        machine
            .handle_event(FulfillmentEvent::PackCompleted { artifacts: artifacts() })
            .unwrap();
        assert_eq!(machine.phase(), FulfillmentPhase::PackAndDispatch);
        assert!(machine.artifacts().is_some());
        assert!(!machine.is_dispatched());

        machine.handle_event(FulfillmentEvent::HandoverCompleted).unwrap();
        assert_eq!(machine.phase(), FulfillmentPhase::Dispatched);
        assert!(machine.is_dispatched());
    }

    #[test]
    fn events_out_of_phase_are_rejected() {
        let mut machine = FulfillmentMachine::new();

        let err = machine
            .handle_event(FulfillmentEvent::OrderAccepted {
                order_code: "ORD-1".to_string(),
                sku_map: sku_map(),
            })
            .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
        assert_eq!(machine.phase(), FulfillmentPhase::Search);
        assert_eq!(machine.order_code(), None);

        let err = machine
            .handle_event(FulfillmentEvent::HandoverCompleted)
            .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTransition { .. }));
    }

    #[test]
    fn handover_requires_a_recorded_pack_result() {
        let mut machine = machine_at_pack_phase();

        let err = machine
            .handle_event(FulfillmentEvent::HandoverCompleted)
            .unwrap_err();
        assert!(matches!(err, TransitionError::HandoverBeforePack));
        assert!(!machine.is_dispatched());
    }

    #[test]
    fn pack_completion_keeps_artifacts_without_advancing() {
        let mut machine = machine_at_pack_phase();
        machine
            .handle_event(FulfillmentEvent::PackCompleted { artifacts: artifacts() })
            .unwrap();

        // A handover failure leaves the machine exactly here: artifacts
        // visible, not dispatched, ready for a retry.
        assert_eq!(machine.phase(), FulfillmentPhase::PackAndDispatch);
        assert_eq!(
            machine.artifacts().unwrap().shipping_label_url.as_deref(),
            Some("L")
        );
        assert!(!machine.is_dispatched());
    }

    #[test]
    fn reset_clears_everything_from_any_phase() {
        let mut machine = machine_at_pack_phase();
        machine
            .handle_event(FulfillmentEvent::PackCompleted { artifacts: artifacts() })
            .unwrap();
        machine.handle_event(FulfillmentEvent::HandoverCompleted).unwrap();
        assert!(machine.is_dispatched());

        machine.reset();

        assert_eq!(machine.phase(), FulfillmentPhase::Search);
        assert!(machine.inventory().is_empty());
        assert!(machine.sku_map().is_empty());
        assert_eq!(machine.order_code(), None);
        assert!(machine.artifacts().is_none());
        assert!(!machine.is_dispatched());
    }

    #[test]
    fn transitions_are_recorded_in_history() {
        let mut machine = machine_at_pack_phase();
        assert_eq!(machine.history().len(), 2);
        assert_eq!(machine.history()[0].from, FulfillmentPhase::Search);
        assert_eq!(machine.history()[0].to, FulfillmentPhase::OrderCreation);

        machine.reset();
        let last = machine.history().last().unwrap();
        assert_eq!(last.from, FulfillmentPhase::PackAndDispatch);
        assert_eq!(last.to, FulfillmentPhase::Search);
    }
}

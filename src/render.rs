//! Plain-text rendering of the current session snapshot.
//!
//! The renderer only reads the session: phase, inventory rows, pack
//! artifact URLs and the dispatch flag. It redraws the whole snapshot
//! after every action.

use std::fmt::Write;

use crate::workflow::state_machine::{FulfillmentMachine, FulfillmentPhase};

pub fn render_session(session: &FulfillmentMachine) -> String {
    let mut out = String::new();
    let phase = session.phase();

    writeln!(out, "== Fulfillment session ({phase}) ==").ok();

    writeln!(out, "1. Search inventory").ok();
    if session.inventory().is_empty() {
        writeln!(out, "   (no inventory searched yet)").ok();
    } else {
        for record in session.inventory() {
            writeln!(
                out,
                "   {}: available quantity {}",
                record.channel_sku_code, record.qc_pass_available_quantity
            )
            .ok();
        }
    }

    if phase != FulfillmentPhase::Search {
        writeln!(out, "2. Create order").ok();
        match session.order_code() {
            Some(order_code) => {
                writeln!(out, "   order {order_code} created").ok();
                for (sku, quantity) in session.sku_map().entries() {
                    writeln!(out, "   {sku} x {quantity}").ok();
                }
            }
            None => {
                writeln!(out, "   (waiting for SKU:quantity map and order code)").ok();
            }
        }
    }

    if matches!(
        phase,
        FulfillmentPhase::PackAndDispatch | FulfillmentPhase::Dispatched
    ) {
        writeln!(out, "3. Pack and dispatch").ok();
        if let Some(artifacts) = session.artifacts() {
            if let Some(url) = &artifacts.shipping_label_url {
                writeln!(out, "   shipping label: {url}").ok();
            }
            if let Some(url) = &artifacts.invoice_url {
                writeln!(out, "   invoice: {url}").ok();
            }
        }
        if session.is_dispatched() {
            writeln!(out, "   pack and dispatch: already completed").ok();
            writeln!(out, "   *** Order dispatched ***").ok();
        } else {
            writeln!(out, "   (order awaiting pack and dispatch)").ok();
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oms::types::{InventoryRecord, PackArtifacts};
    use crate::workflow::sku_map::{MalformedEntryPolicy, SkuQuantityMap};
    use crate::workflow::state_machine::FulfillmentEvent;

    fn dispatched_session() -> FulfillmentMachine {
        let mut machine = FulfillmentMachine::new();
        machine
            .handle_event(FulfillmentEvent::InventoryFound {
                records: vec![InventoryRecord {
                    channel_sku_code: "X1".to_string(),
                    qc_pass_available_quantity: 10,
                }],
            })
            .unwrap();
        machine
            .handle_event(FulfillmentEvent::OrderAccepted {
                order_code: "ORD-1".to_string(),
                sku_map: SkuQuantityMap::parse("X1:2", MalformedEntryPolicy::Drop).unwrap(),
            })
            .unwrap();
        machine
            .handle_event(FulfillmentEvent::PackCompleted {
                artifacts: PackArtifacts {
                    shipping_label_url: Some("http://labels/1".to_string()),
                    invoice_url: Some("http://invoices/1".to_string()),
                },
            })
            .unwrap();
        machine
            .handle_event(FulfillmentEvent::HandoverCompleted)
            .unwrap();
        machine
    }

    #[test]
    fn fresh_session_renders_search_section_only() {
        let rendered = render_session(&FulfillmentMachine::new());

        assert!(rendered.contains("1. Search inventory"));
        assert!(rendered.contains("no inventory searched yet"));
        assert!(!rendered.contains("2. Create order"));
    }

    #[test]
    fn inventory_rows_show_available_quantities() {
        let mut machine = FulfillmentMachine::new();
        machine
            .handle_event(FulfillmentEvent::InventoryFound {
                records: vec![InventoryRecord {
                    channel_sku_code: "X1".to_string(),
                    qc_pass_available_quantity: 10,
                }],
            })
            .unwrap();

        let rendered = render_session(&machine);
        assert!(rendered.contains("X1: available quantity 10"));
        assert!(rendered.contains("2. Create order"));
    }

    #[test]
    fn dispatched_session_marks_action_completed() {
        let rendered = render_session(&dispatched_session());

        assert!(rendered.contains("shipping label: http://labels/1"));
        assert!(rendered.contains("invoice: http://invoices/1"));
        assert!(rendered.contains("pack and dispatch: already completed"));
        assert!(rendered.contains("Order dispatched"));
    }
}

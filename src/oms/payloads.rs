//! Typed payload builders for the four order-management operations.
//!
//! The fixed constant tables (addresses, pricing, tax) live here in one
//! place; every call site goes through a builder instead of assembling
//! JSON ad hoc.

use chrono::{DateTime, Duration, FixedOffset, Utc};

use crate::oms::types::{
    Address, GiftOptions, HandoverRequest, InventorySearchRequest, OrderCustomAttributes,
    OrderItem, OutwardOrder, PackRequest, ShipmentItem, TaxBreakup, TaxItem,
};
use crate::workflow::sku_map::SkuQuantityMap;

pub const ORDER_TYPE: &str = "SO";
pub const QC_STATUS: &str = "PASS";
pub const PAYMENT_METHOD: &str = "COD";
pub const PACK_TYPE: &str = "PIECE";
pub const TRANSPORTER_SELF: &str = "SELF";
pub const CURRENCY: &str = "AED";

pub const SELLING_PRICE_PER_UNIT: u32 = 150;
pub const SELLER_DISCOUNT_PER_UNIT: u32 = 10;
pub const CHANNEL_DISCOUNT_PER_UNIT: u32 = 10;
pub const SHIPPING_CHARGE_PER_UNIT: u32 = 20;
pub const BASE_SELLING_PRICE_PER_UNIT: f64 = 150.0;
pub const VAT_RATE: u32 = 5;
pub const VAT_PER_UNIT: f64 = 2.13;

/// Orders carry wall-clock timestamps in a fixed UTC+05:30 offset with a
/// literal zero millisecond field.
pub const ORDER_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;
const ORDER_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.000+05:30";

/// Order time and dispatch-by time ("now" and "now + 24h") formatted for
/// the order document.
pub fn order_timestamps(now: DateTime<Utc>) -> (String, String) {
    let offset = FixedOffset::east_opt(ORDER_UTC_OFFSET_SECS).expect("fixed +05:30 offset");
    let local = now.with_timezone(&offset);
    let order_time = local.format(ORDER_TIME_FORMAT).to_string();
    let dispatch_by = (local + Duration::days(1)).format(ORDER_TIME_FORMAT).to_string();
    (order_time, dispatch_by)
}

fn shipping_address() -> Address {
    Address {
        name: "Naresh".to_string(),
        line1: "Dubai".to_string(),
        city: "Dubai".to_string(),
        zip: "000000".to_string(),
        country: "UAE".to_string(),
        email: "customer@gmail.com".to_string(),
        phone: "9999999999".to_string(),
    }
}

fn billing_address() -> Address {
    Address {
        email: "customer@example.com".to_string(),
        ..shipping_address()
    }
}

pub fn inventory_search(location_code: &str, sku_codes: &[String]) -> InventorySearchRequest {
    InventorySearchRequest {
        location_code: location_code.to_string(),
        channel_sku_codes: sku_codes.to_vec(),
    }
}

/// Build the outward-order document: one order line and one tax breakup per
/// SKU in the mapping, with the fixed pricing constants above.
pub fn outward_order(
    order_code: &str,
    sku_map: &SkuQuantityMap,
    location_code: &str,
    now: DateTime<Utc>,
) -> OutwardOrder {
    let (order_time, dispatch_by_time) = order_timestamps(now);

    let order_items = sku_map
        .entries()
        .map(|(sku, quantity)| OrderItem {
            channel_sku_code: sku.to_string(),
            order_item_code: sku.to_string(),
            quantity,
            seller_discount_per_unit: SELLER_DISCOUNT_PER_UNIT,
            channel_discount_per_unit: CHANNEL_DISCOUNT_PER_UNIT,
            selling_price_per_unit: SELLING_PRICE_PER_UNIT,
            shipping_charge_per_unit: SHIPPING_CHARGE_PER_UNIT,
            gift_options: GiftOptions {
                giftwrap_required: false,
                gift_message: false,
                gift_charge_per_unit: None,
            },
        })
        .collect();

    let tax_breakup_forms = sku_map
        .entries()
        .map(|(sku, _)| TaxBreakup {
            channel_sku_id: sku.to_string(),
            base_selling_price_per_unit: BASE_SELLING_PRICE_PER_UNIT,
            tax_item_forms: vec![TaxItem {
                kind: "VAT".to_string(),
                rate: VAT_RATE,
                tax_per_unit: VAT_PER_UNIT,
            }],
        })
        .collect();

    OutwardOrder {
        parent_order_code: order_code.to_string(),
        location_code: location_code.to_string(),
        order_code: order_code.to_string(),
        order_time: order_time.clone(),
        start_processing_time: order_time,
        dispatch_by_time,
        order_type: ORDER_TYPE.to_string(),
        is_priority: false,
        gift: false,
        on_hold: false,
        qc_status: QC_STATUS.to_string(),
        payment_method: PAYMENT_METHOD.to_string(),
        is_split_required: "false".to_string(),
        pack_type: PACK_TYPE.to_string(),
        shipping_address: shipping_address(),
        billing_address: billing_address(),
        order_items,
        tax_breakup_forms,
        order_custom_attributes: OrderCustomAttributes {
            currency: CURRENCY.to_string(),
        },
    }
}

/// The pack payload references the same SKU set as the order document; the
/// session's mapping is the single source of truth for both.
pub fn pack_request(
    order_code: &str,
    sku_map: &SkuQuantityMap,
    location_code: &str,
    channel_name: &str,
) -> PackRequest {
    PackRequest {
        order_code: order_code.to_string(),
        location_code: location_code.to_string(),
        channel_name: channel_name.to_string(),
        shipment_items: sku_map
            .entries()
            .map(|(sku, quantity)| ShipmentItem {
                channel_sku_code: sku.to_string(),
                quantity_to_pack: quantity.to_string(),
            })
            .collect(),
    }
}

pub fn handover_request(
    order_code: &str,
    location_code: &str,
    channel_name: &str,
) -> HandoverRequest {
    HandoverRequest {
        channel_name: channel_name.to_string(),
        location_code: location_code.to_string(),
        order_codes: vec![order_code.to_string()],
        transporter: TRANSPORTER_SELF.to_string(),
    }
}

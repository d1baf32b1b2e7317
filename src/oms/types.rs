//! Wire types for the four order-management service operations.
//!
//! Field names follow the service's JSON contract (camelCase, with a few
//! quirks preserved: `isSplitRequired` is a string, pack quantities are
//! strings, `giftChargePerUnit` is an explicit null).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySearchRequest {
    pub location_code: String,
    pub channel_sku_codes: Vec<String>,
}

/// One inventory row as returned by the search operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub channel_sku_code: String,
    /// Quantity that passed quality control; absent on the wire means zero.
    #[serde(default)]
    pub qc_pass_available_quantity: u64,
}

/// The search endpoint answers either `{"inventories": [..]}` or a bare
/// array depending on the deployment; both forms decode to the same rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum InventorySearchResponse {
    Wrapped { inventories: Vec<InventoryRecord> },
    Bare(Vec<InventoryRecord>),
}

impl InventorySearchResponse {
    pub fn into_records(self) -> Vec<InventoryRecord> {
        match self {
            InventorySearchResponse::Wrapped { inventories } => inventories,
            InventorySearchResponse::Bare(records) => records,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub name: String,
    pub line1: String,
    pub city: String,
    pub zip: String,
    pub country: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftOptions {
    pub giftwrap_required: bool,
    pub gift_message: bool,
    pub gift_charge_per_unit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub channel_sku_code: String,
    pub order_item_code: String,
    pub quantity: u32,
    pub seller_discount_per_unit: u32,
    pub channel_discount_per_unit: u32,
    pub selling_price_per_unit: u32,
    pub shipping_charge_per_unit: u32,
    pub gift_options: GiftOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxItem {
    #[serde(rename = "type")]
    pub kind: String,
    pub rate: u32,
    pub tax_per_unit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakup {
    pub channel_sku_id: String,
    pub base_selling_price_per_unit: f64,
    pub tax_item_forms: Vec<TaxItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCustomAttributes {
    pub currency: String,
}

/// Full outward-order document for the create-order operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutwardOrder {
    pub parent_order_code: String,
    pub location_code: String,
    pub order_code: String,
    pub order_time: String,
    pub start_processing_time: String,
    pub dispatch_by_time: String,
    pub order_type: String,
    pub is_priority: bool,
    pub gift: bool,
    pub on_hold: bool,
    pub qc_status: String,
    pub payment_method: String,
    /// String on the wire, not a boolean.
    pub is_split_required: String,
    pub pack_type: String,
    pub shipping_address: Address,
    pub billing_address: Address,
    pub order_items: Vec<OrderItem>,
    pub tax_breakup_forms: Vec<TaxBreakup>,
    pub order_custom_attributes: OrderCustomAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentItem {
    pub channel_sku_code: String,
    /// Quantity serialized as a string, per the pack contract.
    pub quantity_to_pack: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackRequest {
    pub order_code: String,
    pub location_code: String,
    pub channel_name: String,
    pub shipment_items: Vec<ShipmentItem>,
}

/// Artifacts extracted from a successful pack response. Either URL may be
/// absent depending on the channel configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackArtifacts {
    #[serde(default)]
    pub shipping_label_url: Option<String>,
    #[serde(default)]
    pub invoice_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverRequest {
    pub channel_name: String,
    pub location_code: String,
    pub order_codes: Vec<String>,
    pub transporter: String,
}

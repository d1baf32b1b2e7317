pub mod controller;
pub mod sku_map;
pub mod state_machine;

pub use controller::{FulfillmentController, FulfillmentError};
pub use sku_map::{MalformedEntryPolicy, SkuMapError, SkuQuantityMap};
pub use state_machine::{
    FulfillmentEvent, FulfillmentMachine, FulfillmentPhase, TransitionError, TransitionRecord,
};

//! Parsing of operator-supplied SKU lists and `SKU:QTY` mappings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// What to do with an entry that does not parse as `code:positive-integer`.
///
/// The historical behaviour is to drop such entries silently and keep the
/// rest; strict mode rejects the whole input instead. Selected through
/// `workflow.strict_sku_map` in the configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedEntryPolicy {
    #[default]
    Drop,
    Reject,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkuMapError {
    #[error("malformed SKU:quantity entry {entry:?}")]
    MalformedEntry { entry: String },
}

/// Requested quantity per SKU code. Set once at order creation and then
/// immutable for the rest of the session: the order payload and the later
/// pack payload are both derived from this same mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuQuantityMap {
    entries: BTreeMap<String, u32>,
}

impl SkuQuantityMap {
    /// Parse an input like `"SKU1:5, SKU2:3"`. Entries that are blank after
    /// trimming are skipped; duplicate codes keep the last quantity seen.
    pub fn parse(input: &str, policy: MalformedEntryPolicy) -> Result<Self, SkuMapError> {
        let mut entries = BTreeMap::new();

        for raw in input.split(',') {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            match parse_entry(entry) {
                Some((code, quantity)) => {
                    entries.insert(code, quantity);
                }
                None => match policy {
                    MalformedEntryPolicy::Reject => {
                        return Err(SkuMapError::MalformedEntry {
                            entry: entry.to_string(),
                        });
                    }
                    MalformedEntryPolicy::Drop => {
                        warn!(entry, "dropping malformed SKU:quantity entry");
                    }
                },
            }
        }

        Ok(Self { entries })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn quantity(&self, sku_code: &str) -> Option<u32> {
        self.entries.get(sku_code).copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(code, qty)| (code.as_str(), *qty))
    }

    pub fn sku_codes(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn parse_entry(entry: &str) -> Option<(String, u32)> {
    let (code, quantity) = entry.split_once(':')?;
    let code = code.trim();
    if code.is_empty() {
        return None;
    }
    let quantity: u32 = quantity.trim().parse().ok()?;
    if quantity == 0 {
        return None;
    }
    Some((code.to_string(), quantity))
}

/// Split a comma-separated SKU list, dropping blank segments.
pub fn split_sku_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|sku| !sku.is_empty())
        .map(str::to_string)
        .collect()
}

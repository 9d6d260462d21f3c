use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// Everything a durable store persists: one record per holding plus the
/// base-currency preference.
///
/// `base_currency` is `None` until the user (or first run) commits one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredPortfolio {
    pub holdings: Vec<Holding>,

    #[serde(default)]
    pub base_currency: Option<String>,
}

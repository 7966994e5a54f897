use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{de, Retailer};

/// A price as reported for one store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StorePrice {
    #[serde(default, deserialize_with = "de::id")]
    pub store_id: String,
    #[serde(default, deserialize_with = "de::id")]
    pub product_id: String,
    /// Kept exactly as written: integer, float, string or `null`.
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub currency: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub in_stock: Option<bool>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub discount_active: Option<bool>,
}

/// A price for one product at one retailer, with the product's display
/// fields copied on. `None` fields are written as `null`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetailerPrice {
    pub doc_id: String,
    pub retailer_id: Retailer,
    pub product_id: String,
    pub price: Option<Value>,
    pub currency: String,
    pub in_stock: bool,
    pub discount_active: bool,
    pub product_name: Option<String>,
    pub product_image: Option<String>,
    pub category: Option<String>,
    pub product_type: Option<String>,
    pub keywords: Vec<String>,
    pub unit: Option<String>,
    pub last_updated: String,
}

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::Record;

/// A product from the global export. Fields the pipeline doesn't read
/// stay where they were.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Product(Record);

impl Deref for Product {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl Product {
    pub fn product_id(&self) -> Option<String> {
        self.id("product_id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    pub fn category(&self) -> Option<&str> {
        self.str("category")
    }

    pub fn product_type(&self) -> Option<&str> {
        self.str("product_type")
    }

    pub fn image_url(&self) -> Option<&str> {
        self.str("image_url")
    }

    pub fn general_unit(&self) -> Option<&str> {
        self.str("general_unit")
    }

    /// Missing or malformed lists read as empty.
    pub fn keywords(&self) -> Vec<String> {
        self.parse("keywords").unwrap_or_default()
    }

    pub fn set_keywords(&mut self, keywords: Vec<String>) {
        self.0.set("keywords", keywords);
    }

    /// Rewrites the name and category text.
    pub fn rewrite_text(&mut self, f: impl Fn(&str) -> String) {
        self.0.update_str("name", &f);
        self.0.update_str("category", &f);
    }
}

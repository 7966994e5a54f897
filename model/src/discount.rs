use std::ops::Deref;

use serde::{Deserialize, Serialize};

use crate::Record;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Discount(Record);

impl Deref for Discount {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl Discount {
    pub fn product_name(&self) -> Option<&str> {
        self.str("product_name")
    }

    pub fn rewrite_text(&mut self, f: impl Fn(&str) -> String) {
        self.0.update_str("product_name", f);
    }
}

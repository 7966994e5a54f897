use std::ops::Deref;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Record, Retailer};

/// A store from the export. `retailer_id` and `coordinates` are always
/// overwritten, so whatever the input had there is never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store(Record);

impl Deref for Store {
    type Target = Record;

    fn deref(&self) -> &Record {
        &self.0
    }
}

impl Store {
    pub fn store_id(&self) -> Option<String> {
        self.id("store_id")
    }

    pub fn name(&self) -> Option<&str> {
        self.str("name")
    }

    pub fn address(&self) -> Option<&str> {
        self.str("address")
    }

    pub fn location_text(&self) -> Option<&str> {
        self.str("location_text")
    }

    pub fn retailer_id(&self) -> Option<Retailer> {
        self.parse("retailer_id")
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.parse("coordinates")
    }

    /// Drops the legacy location field.
    pub fn remove_geo_point(&mut self) {
        self.0.remove("geo_point");
    }

    pub fn set_store_id(&mut self, store_id: String) {
        self.0.set("store_id", store_id);
    }

    pub fn set_retailer_id(&mut self, retailer: Retailer) {
        self.0.set("retailer_id", retailer.slug());
    }

    pub fn set_coordinates(&mut self, coordinates: Coordinates) {
        self.0.set(
            "coordinates",
            json!({
                "latitude": coordinates.latitude,
                "longitude": coordinates.longitude,
            }),
        );
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// (0, 0) stands in for "no usable location".
    pub fn is_default(&self) -> bool {
        self.latitude == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(value: serde_json::Value) -> Store {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn rewrites_in_place() {
        let mut x = store(json!({
            "store_id": "coop_12",
            "retailer_id": "lidl",
            "geo_point": {"lat": 1},
            "name": "Coop",
            "coordinates": "n/a",
            "opening_hours": null
        }));
        assert_eq!(x.retailer_id(), None);
        assert_eq!(x.coordinates(), None);

        x.remove_geo_point();
        x.set_retailer_id(Retailer::Coop);
        x.set_coordinates(Coordinates::new(46.2, 6.1));

        assert_eq!(x.retailer_id(), Some(Retailer::Coop));
        assert_eq!(x.coordinates(), Some(Coordinates::new(46.2, 6.1)));
        assert_eq!(
            serde_json::to_string(&x).unwrap(),
            r#"{"store_id":"coop_12","retailer_id":"coop","name":"Coop","coordinates":{"latitude":46.2,"longitude":6.1},"opening_hours":null}"#
        );
    }

    #[test]
    fn null_and_numeric_ids() {
        assert_eq!(store(json!({"store_id": null})).store_id(), None);
        assert_eq!(store(json!({"store_id": 12})).store_id().as_deref(), Some("12"));
        assert_eq!(store(json!({"name": ["x"]})).name(), None);
    }
}

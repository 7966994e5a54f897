use _model::{Coordinates, Retailer, Store};
use anyhow::Result;
use indicatif::ProgressIterator;
use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    config::Config,
    utils::{file_name, progress_bar, read_json, require, write_json},
};

pub use self::cache::GeocodeCache;
use self::geocoding::{Geocoder, GoogleGeocoder};

mod cache;
mod geocoding;

/// Address and location text, trimmed, comma-joined and with whitespace
/// runs collapsed. This is the geocode cache key.
pub fn normalize_address(parts: &[&str]) -> String {
    parts
        .iter()
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .join(", ")
        .split_whitespace()
        .join(" ")
}

pub fn store_address(store: &Store) -> String {
    normalize_address(&[
        store.address().unwrap_or_default(),
        store.location_text().unwrap_or_default(),
    ])
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Lookup {
    /// Nothing to geocode.
    Empty,
    Cached(Coordinates),
    Fetched(Coordinates),
    /// Not cached and no geocoder configured.
    Skipped,
}

impl Lookup {
    pub fn coordinates(&self) -> Coordinates {
        match self {
            Self::Cached(x) | Self::Fetched(x) => *x,
            Self::Empty | Self::Skipped => Coordinates::default(),
        }
    }
}

pub fn locate(
    store: &Store,
    geocoder: Option<&dyn Geocoder>,
    cache: &mut GeocodeCache,
) -> Lookup {
    let address = store_address(store);
    if address.is_empty() {
        return Lookup::Empty;
    }

    if let Some(cached) = cache.get(&address) {
        return Lookup::Cached(cached.coordinates());
    }

    match geocoder {
        Some(geocoder) => {
            let result = geocoder.geocode(&address);
            Lookup::Fetched(cache.insert(address, result).coordinates())
        }
        None => Lookup::Skipped,
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub cache_hits: usize,
    pub cache_misses: usize,
    pub fetched: usize,
    pub geocoded: usize,
    pub defaulted: usize,
}

/// Classifies each store by name, attaches coordinates and fills in
/// missing or null ids. The cache is updated in memory only.
pub fn transform(
    stores: &mut [Store],
    geocoder: Option<&dyn Geocoder>,
    cache: &mut GeocodeCache,
) -> Summary {
    let mut summary = Summary::default();
    let len = stores.len() as u64;

    for store in stores.iter_mut().progress_with(progress_bar(len)) {
        store.remove_geo_point();
        let retailer = Retailer::classify(store.name().unwrap_or_default());
        store.set_retailer_id(retailer);

        let lookup = locate(store, geocoder, cache);
        match lookup {
            Lookup::Cached(_) => summary.cache_hits += 1,
            Lookup::Fetched(_) => {
                summary.cache_misses += 1;
                summary.fetched += 1;
            }
            Lookup::Empty | Lookup::Skipped => summary.cache_misses += 1,
        }

        let coordinates = lookup.coordinates();
        if coordinates.is_default() {
            summary.defaulted += 1;
        } else {
            summary.geocoded += 1;
        }
        store.set_coordinates(coordinates);

        if store.store_id().is_none() {
            let name = store.name().unwrap_or("store").to_lowercase();
            store.set_store_id(format!("unknown_{name}"));
        }
    }

    summary
}

pub fn run(config: &Config) -> Result<()> {
    let input = &config.inputs.stores;
    require(input)?;
    let mut stores: Vec<Store> = read_json(input)?;

    let cache_path = &config.geocoding.cache;
    let mut cache = GeocodeCache::load_or_default(cache_path);
    info!("Loaded {} cached store coordinates", cache.len());

    let geocoder = config
        .geocoding
        .api_key()
        .map(|key| GoogleGeocoder::new(&config.geocoding, key));
    if geocoder.is_none() {
        info!("No geocoding API key configured, uncached stores get (0, 0)");
    }

    let summary = transform(
        &mut stores,
        geocoder.as_ref().map(|x| x as &dyn Geocoder),
        &mut cache,
    );

    if let Err(e) = cache.save(cache_path) {
        warn!("Geocode cache not saved to {}: {e}", cache_path.display());
    }

    write_json(&config.outputs.stores, &stores)?;

    info!("Stores complete: {}", file_name(&config.outputs.stores));
    info!("  Transformed {} stores with coordinates", stores.len());
    info!(
        "  Cache hits: {}, Cache misses: {} ({} looked up)",
        summary.cache_hits, summary.cache_misses, summary.fetched
    );
    info!(
        "  Geocoded: {}, Default (0.0): {}",
        summary.geocoded, summary.defaulted
    );
    if let Some(sample) = stores.first() {
        info!(
            "  Sample: {} - {}",
            sample.name().unwrap_or("?"),
            sample.location_text().unwrap_or("?")
        );
        info!("  Coordinates: {:?}", sample.coordinates().unwrap_or_default());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::geocoding::GeocodeResult;
    use super::*;

    /// Answers every address with the same result and remembers the calls.
    struct FakeGeocoder {
        result: GeocodeResult,
        calls: RefCell<Vec<String>>,
    }

    impl FakeGeocoder {
        fn new(result: GeocodeResult) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, address: &str) -> GeocodeResult {
            self.calls.borrow_mut().push(address.to_string());
            self.result.clone()
        }
    }

    fn store(name: &str, address: &str, location: &str) -> Store {
        serde_json::from_value(serde_json::json!({
            "store_id": format!("{}_1", name.to_lowercase()),
            "name": name,
            "address": address,
            "location_text": location,
        }))
        .unwrap()
    }

    #[test]
    fn address_normalization() {
        assert_eq!(
            normalize_address(&["  Rue  du Rhône 48 ", "1204   Genève"]),
            "Rue du Rhône 48, 1204 Genève"
        );
        assert_eq!(normalize_address(&["", " Bern "]), "Bern");
        assert_eq!(normalize_address(&["  ", ""]), "");

        let once = normalize_address(&["Bahnhof\tstrasse  1 ", " 8001 Zürich"]);
        assert_eq!(normalize_address(&[once.as_str()]), once);
        assert_eq!(normalize_address(&[once.as_str(), ""]), once);
    }

    #[test]
    fn failed_lookup_is_cached() {
        let geocoder = FakeGeocoder::new(GeocodeResult::sentinel("ZERO_RESULTS"));
        let mut cache = GeocodeCache::default();
        let mut stores = vec![
            store("Coop", "Nowhere 1", "Atlantis"),
            store("Coop Pronto", " Nowhere  1", "Atlantis "),
        ];

        let summary = transform(&mut stores, Some(&geocoder), &mut cache);
        assert_eq!(geocoder.calls.borrow().as_slice(), ["Nowhere 1, Atlantis"]);
        assert_eq!(
            cache.get("Nowhere 1, Atlantis"),
            Some(&GeocodeResult::sentinel("ZERO_RESULTS"))
        );
        assert_eq!(summary.cache_hits, 1);
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.defaulted, 2);

        // a later run reuses the failure
        let mut again = vec![store("Coop", "Nowhere 1", "Atlantis")];
        transform(&mut again, Some(&geocoder), &mut cache);
        assert_eq!(geocoder.calls.borrow().len(), 1);
        assert_eq!(again[0].coordinates(), Some(Coordinates::default()));
    }

    #[test]
    fn successful_lookup() {
        let geocoder = FakeGeocoder::new(GeocodeResult {
            latitude: 47.37,
            longitude: 8.54,
            status: Some("OK".to_string()),
            accuracy: Some("ROOFTOP".to_string()),
        });
        let mut cache = GeocodeCache::default();
        let mut stores = vec![store("Migros City", "Löwenstrasse 31", "8001 Zürich")];

        let summary = transform(&mut stores, Some(&geocoder), &mut cache);
        assert_eq!(stores[0].coordinates(), Some(Coordinates::new(47.37, 8.54)));
        assert_eq!(stores[0].retailer_id(), Some(Retailer::Migros));
        assert_eq!(summary.geocoded, 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn without_geocoder_nothing_is_cached() {
        let mut cache = GeocodeCache::default();
        let mut stores = vec![store("Denner", "Hauptstrasse 3", "Olten")];

        let summary = transform(&mut stores, None, &mut cache);
        assert!(cache.is_empty());
        assert_eq!(stores[0].coordinates(), Some(Coordinates::default()));
        assert_eq!(summary.cache_misses, 1);
    }

    #[test]
    fn empty_address_skips_lookup() {
        let geocoder = FakeGeocoder::new(GeocodeResult::sentinel("OK"));
        let mut cache = GeocodeCache::default();
        let mut stores = vec![store("Aldi", " ", "")];

        let lookup = locate(&stores[0], Some(&geocoder), &mut cache);
        assert_eq!(lookup, Lookup::Empty);

        transform(&mut stores, Some(&geocoder), &mut cache);
        assert!(geocoder.calls.borrow().is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn restructures_records() {
        let mut stores: Vec<Store> = serde_json::from_str(
            r#"[
                {"name": "ALIGRO Chavannes", "address": "Route de Genève 1", "geo_point": {"lat": 1, "lon": 2}, "opening_hours": "8-20"},
                {"store_id": "lidl_4", "name": "Lidl"}
            ]"#,
        )
        .unwrap();
        transform(&mut stores, None, &mut GeocodeCache::default());

        let output = serde_json::to_value(&stores).unwrap();
        assert_eq!(output[0]["store_id"], "unknown_aligro chavannes");
        assert_eq!(output[0]["retailer_id"], "aligro");
        assert_eq!(output[0]["opening_hours"], "8-20");
        assert_eq!(output[0]["coordinates"]["latitude"], 0.0);
        assert!(output[0].get("geo_point").is_none());
        assert_eq!(output[1]["store_id"], "lidl_4");
        assert_eq!(output[1]["retailer_id"], "other");
    }

    #[test]
    fn odd_records_are_overwritten_not_rejected() {
        let mut stores: Vec<Store> = serde_json::from_str(
            r#"[
                {"store_id": null, "name": "Coop Pronto", "retailer_id": "lidl", "coordinates": [0, 0], "address": null, "floor": null},
                {"store_id": 99, "name": "Denner", "coordinates": {"latitude": "x"}}
            ]"#,
        )
        .unwrap();
        transform(&mut stores, None, &mut GeocodeCache::default());

        assert_eq!(
            serde_json::to_string(&stores[0]).unwrap(),
            r#"{"store_id":"unknown_coop pronto","name":"Coop Pronto","retailer_id":"coop","coordinates":{"latitude":0.0,"longitude":0.0},"address":null,"floor":null}"#
        );
        assert_eq!(stores[1].store_id().as_deref(), Some("99"));
        assert_eq!(stores[1].get("store_id"), Some(&serde_json::json!(99)));
        assert_eq!(stores[1].retailer_id(), Some(Retailer::Denner));
        assert_eq!(stores[1].coordinates(), Some(Coordinates::default()));
    }

    #[test]
    fn run_persists_cache() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default().resolve(dir.path());
        write_json(
            &config.inputs.stores,
            &vec![store("Coop", "Marktgasse 5", "Bern")],
        )
        .unwrap();

        let mut cache = GeocodeCache::default();
        cache.insert(
            "Marktgasse 5, Bern".to_string(),
            GeocodeResult {
                latitude: 46.948,
                longitude: 7.447,
                status: Some("OK".to_string()),
                accuracy: None,
            },
        );
        cache.save(&config.geocoding.cache).unwrap();

        run(&config).unwrap();

        let stores: Vec<Store> = read_json(&config.outputs.stores).unwrap();
        assert_eq!(stores[0].coordinates(), Some(Coordinates::new(46.948, 7.447)));
        assert_eq!(GeocodeCache::load(&config.geocoding.cache).unwrap(), cache);
    }
}

use std::collections::BTreeMap;

use _model::{Product, Retailer, RetailerPrice, StorePrice};
use anyhow::{ensure, Result};
use chrono::{SecondsFormat, Utc};
use itertools::Itertools;
use tracing::{info, warn};

use crate::{
    config::Config,
    utils::{file_name, read_json, require, write_json},
};

const DEFAULT_CURRENCY: &str = "CHF";

pub type ProductIndex = BTreeMap<String, Product>;

#[derive(Debug, Default, PartialEq)]
pub struct Summary {
    pub denormalized: usize,
    pub missing: usize,
}

/// Products keyed by id; ones without an id can't be referenced and are dropped.
pub fn index_products(products: Vec<Product>) -> ProductIndex {
    let total = products.len();
    let index: ProductIndex = products
        .into_iter()
        .filter_map(|x| Some((x.product_id()?, x)))
        .collect();
    if index.len() < total {
        warn!(
            "{} products without product_id left out of the lookup",
            total - index.len()
        );
    }
    index
}

/// Collapses store prices to one price per (retailer, product).
///
/// The retailer comes from classifying the store id. The first store price
/// seen for a pair is kept and later ones are dropped, even if they differ.
/// Output is ordered by retailer id, then product id.
pub fn aggregate(
    inventory: &[StorePrice],
    products: &ProductIndex,
    last_updated: &str,
) -> (Vec<RetailerPrice>, Summary) {
    let mut first_seen: BTreeMap<(&str, &str), (Retailer, &StorePrice)> = BTreeMap::new();
    for item in inventory {
        let retailer = Retailer::classify(&item.store_id);
        first_seen
            .entry((retailer.slug(), item.product_id.as_str()))
            .or_insert((retailer, item));
    }

    let mut summary = Summary::default();
    let mut output = Vec::with_capacity(first_seen.len());
    for ((retailer_id, product_id), (retailer, item)) in first_seen {
        let product = products.get(product_id);
        match product {
            Some(_) => summary.denormalized += 1,
            None => summary.missing += 1,
        }

        output.push(RetailerPrice {
            doc_id: format!("{retailer_id}_{product_id}"),
            retailer_id: retailer,
            product_id: product_id.to_string(),
            price: item.price.clone(),
            currency: item
                .currency
                .clone()
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            in_stock: item.in_stock.unwrap_or(false),
            discount_active: item.discount_active.unwrap_or(false),
            product_name: product.and_then(Product::name).map(str::to_string),
            product_image: product.and_then(Product::image_url).map(str::to_string),
            category: product.and_then(Product::category).map(str::to_string),
            product_type: product.and_then(Product::product_type).map(str::to_string),
            keywords: product.map(Product::keywords).unwrap_or_default(),
            unit: product.and_then(Product::general_unit).map(str::to_string),
            last_updated: last_updated.to_string(),
        });
    }

    (output, summary)
}

pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn run(config: &Config) -> Result<()> {
    let input = &config.inputs.store_prices;
    require(input)?;
    let inventory: Vec<StorePrice> = read_json(input)?;

    let products_path = &config.outputs.products;
    ensure!(
        products_path.exists(),
        "{} not found. Run the products phase first.",
        products_path.display()
    );
    let products = index_products(read_json(products_path)?);

    let last_updated = timestamp();
    let (prices, summary) = aggregate(&inventory, &products, &last_updated);
    write_json(&config.outputs.retailer_prices, &prices)?;

    info!(
        "Retailer prices complete: {}",
        file_name(&config.outputs.retailer_prices)
    );
    info!("  Transformed {} retailer-level prices", prices.len());
    info!(
        "  Retailers: {}",
        prices.iter().map(|x| x.retailer_id).unique().count()
    );
    info!(
        "  Denormalized: {}, Missing products: {}",
        summary.denormalized, summary.missing
    );
    info!("  Timestamp: {last_updated}");
    for sample in prices.iter().unique_by(|x| x.retailer_id).take(3) {
        info!("  Sample ({}): {}", sample.retailer_id.slug(), sample.doc_id);
        info!(
            "    Product: {}",
            sample.product_name.as_deref().unwrap_or("None")
        );
        info!(
            "    Price: {} {}",
            sample.price.as_ref().map_or("None".to_string(), |x| x.to_string()),
            sample.currency
        );
    }

    Ok(())
}

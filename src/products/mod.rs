use std::{collections::BTreeMap, path::Path};

use _model::Product;
use anyhow::Result;
use tracing::info;

use crate::{
    config::Config,
    text,
    utils::{file_name, read_json, require, write_json},
};

/// Product id -> search keywords, maintained by hand.
pub type Keywords = BTreeMap<String, Vec<String>>;

pub fn load_keywords(path: &Path) -> Result<Keywords> {
    if !path.exists() {
        info!(
            "Keywords file not found: {} (will use empty keywords)",
            file_name(path)
        );
        return Ok(Keywords::new());
    }

    let keywords: Keywords = read_json(path)?;
    info!(
        "Loaded keywords for {} products from {}",
        keywords.len(),
        file_name(path)
    );
    Ok(keywords)
}

/// Cleans name and category and replaces keywords with the mapped ones
/// (or none). Everything else on the product is left alone.
pub fn transform(products: &mut [Product], keywords: &Keywords, strip_diacritics: bool) {
    for product in products {
        product.rewrite_text(|x| text::clean(x, strip_diacritics));

        let mapped = product
            .product_id()
            .and_then(|id| keywords.get(&id))
            .cloned()
            .unwrap_or_default();
        product.set_keywords(mapped);
    }
}

pub fn run(config: &Config) -> Result<()> {
    let input = &config.inputs.products;
    require(input)?;

    let keywords = load_keywords(&config.inputs.product_keywords)?;
    let mut products: Vec<Product> = read_json(input)?;
    transform(&mut products, &keywords, config.text.strip_diacritics);
    write_json(&config.outputs.products, &products)?;

    info!("Products complete: {}", file_name(&config.outputs.products));
    info!(
        "  Transformed {} products (keywords from mapping file)",
        products.len()
    );
    let with_type = products
        .iter()
        .filter(|x| x.product_type().is_some_and(|x| !x.is_empty()))
        .count();
    info!("  Products with product_type: {with_type}/{}", products.len());
    if let Some(sample) = products.first() {
        info!("  Sample: {}", sample.name().unwrap_or("?"));
        info!("  Product Type: {}", sample.product_type().unwrap_or("N/A"));
        info!("  Keywords: {:?}", sample.keywords());
    }

    Ok(())
}

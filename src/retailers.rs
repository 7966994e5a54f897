use _model::{CatalogEntry, Retailer};
use anyhow::Result;
use itertools::Itertools;
use tracing::info;

use crate::{
    config::Config,
    utils::{file_name, write_json},
};

pub fn catalog() -> Vec<CatalogEntry> {
    Retailer::all().iter().map(|x| x.catalog_entry()).collect()
}

pub fn run(config: &Config) -> Result<()> {
    let retailers = catalog();
    write_json(&config.outputs.retailers, &retailers)?;

    info!("Retailers complete: {}", file_name(&config.outputs.retailers));
    info!("  Created {} retailer entries", retailers.len());
    info!("  Retailers: {}", retailers.iter().map(|x| &x.name).join(", "));

    Ok(())
}

use _model::Discount;
use anyhow::Result;
use tracing::{info, warn};

use crate::{
    config::Config,
    text,
    utils::{file_name, read_json, write_json},
};

pub fn transform(discounts: &mut [Discount], strip_diacritics: bool) {
    for discount in discounts {
        discount.rewrite_text(|x| text::clean(x, strip_diacritics));
    }
}

/// Cleans the discounts file in place. A missing file is skipped.
pub fn run(config: &Config) -> Result<()> {
    let path = &config.outputs.discounts;
    if !path.exists() {
        warn!("Discounts file not found: {}", path.display());
        return Ok(());
    }

    let mut discounts: Vec<Discount> = read_json(path)?;
    transform(&mut discounts, config.text.strip_diacritics);
    write_json(path, &discounts)?;

    info!("Discounts complete: {}", file_name(path));
    info!("  Cleaned {} discount entries", discounts.len());
    if let Some(sample) = discounts.first() {
        info!("  Sample: {}", sample.product_name().unwrap_or("None"));
        if let Some(x) = sample.get("discount_percentage") {
            info!("  Discount: {x}%");
        }
    }

    Ok(())
}

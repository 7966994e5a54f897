use std::fmt;

use serde::{Deserialize, Serialize};

mod de;
mod discount;
mod price;
mod product;
mod record;
mod store;

pub use discount::Discount;
pub use price::{RetailerPrice, StorePrice};
pub use product::Product;
pub use record::Record;
pub use store::{Coordinates, Store};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Retailer {
    Migros,
    Coop,
    Denner,
    Aldi,
    Aligro,
    Other,
}

impl fmt::Display for Retailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Retailer {
    pub fn all() -> Vec<Self> {
        vec![
            Self::Migros,
            Self::Coop,
            Self::Denner,
            Self::Aldi,
            Self::Aligro,
            Self::Other,
        ]
    }

    /// Matches a free-text store or chain name against the known chains.
    ///
    /// Case-insensitive substring containment, checked in a fixed order, so
    /// "Migros Coop" is Migros. Anything unmatched (including "") is Other.
    pub fn classify(name: &str) -> Self {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Self::Other;
        }

        for retailer in [
            Self::Migros,
            Self::Coop,
            Self::Denner,
            Self::Aldi,
            Self::Aligro,
        ] {
            if name.contains(retailer.slug()) {
                return retailer;
            }
        }

        Self::Other
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Migros => "Migros",
            Self::Coop => "Coop",
            Self::Denner => "Denner",
            Self::Aldi => "Aldi",
            Self::Aligro => "Aligro",
            Self::Other => "Other",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::Migros => "migros",
            Self::Coop => "coop",
            Self::Denner => "denner",
            Self::Aldi => "aldi",
            Self::Aligro => "aligro",
            Self::Other => "other",
        }
    }

    pub fn catalog_entry(&self) -> CatalogEntry {
        match self {
            Self::Migros => self.entry(
                Some("https://upload.wikimedia.org/wikipedia/commons/thumb/b/b9/Migros-Logo.svg/320px-Migros-Logo.svg.png"),
                Some("https://www.migros.ch"),
                "Switzerland's largest supermarket chain",
                "#FF6600",
                &["Supermarket", "Hypermarket"],
            ),
            Self::Coop => self.entry(
                Some("https://upload.wikimedia.org/wikipedia/commons/thumb/2/26/Coop_Logo.svg/320px-Coop_Logo.svg.png"),
                Some("https://www.coop.ch"),
                "Switzerland's second largest supermarket chain",
                "#E30613",
                &["Supermarket", "Hypermarket"],
            ),
            Self::Denner => self.entry(
                Some("https://upload.wikimedia.org/wikipedia/commons/thumb/1/1f/Denner_Logo.svg/320px-Denner_Logo.svg.png"),
                Some("https://www.denner.ch"),
                "Swiss discount supermarket chain",
                "#D70926",
                &["Discount Supermarket"],
            ),
            Self::Aldi => self.entry(
                Some("https://upload.wikimedia.org/wikipedia/commons/thumb/4/4e/Aldi_Sud_logo.svg/320px-Aldi_Sud_logo.svg.png"),
                Some("https://www.aldi-suisse.ch"),
                "International discount supermarket chain",
                "#009FE3",
                &["Discount Supermarket"],
            ),
            Self::Aligro => self.entry(
                Some("https://www.aligro.ch/themes/custom/aligro/logo.svg"),
                Some("https://www.aligro.ch"),
                "Swiss cash-and-carry and wholesale food supplier",
                "#E30613",
                &["Cash & Carry", "Wholesale"],
            ),
            Self::Other => self.entry(None, None, "Other retailers", "#808080", &["Various"]),
        }
    }

    fn entry(
        &self,
        logo_url: Option<&str>,
        website: Option<&str>,
        description: &str,
        primary_color: &str,
        categories: &[&str],
    ) -> CatalogEntry {
        CatalogEntry {
            retailer_id: self.slug().to_string(),
            name: self.name().to_string(),
            logo_url: logo_url.map(str::to_string),
            website: website.map(str::to_string),
            description: description.to_string(),
            primary_color: primary_color.to_string(),
            categories: categories.iter().map(|x| x.to_string()).collect(),
        }
    }
}

/// One document of the retailers collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub retailer_id: String,
    pub name: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub description: String,
    pub primary_color: String,
    pub categories: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify() {
        assert_eq!(Retailer::classify("COOP Supermarché"), Retailer::Coop);
        assert_eq!(Retailer::classify("coop supermarché"), Retailer::Coop);
        assert_eq!(Retailer::classify("  Migros Genève  "), Retailer::Migros);
        assert_eq!(Retailer::classify("aligro_3"), Retailer::Aligro);
        assert_eq!(Retailer::classify("Lidl Lausanne"), Retailer::Other);
        assert_eq!(Retailer::classify(""), Retailer::Other);
        assert_eq!(Retailer::classify("   "), Retailer::Other);
    }

    #[test]
    fn classify_priority() {
        // migros is checked before coop
        assert_eq!(Retailer::classify("Coop next to Migros"), Retailer::Migros);
    }

    #[test]
    fn catalog() {
        let entries: Vec<_> = Retailer::all().iter().map(|x| x.catalog_entry()).collect();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].retailer_id, "migros");

        let other = Retailer::Other.catalog_entry();
        assert_eq!(other.logo_url, None);
        assert_eq!(other.website, None);
        assert_eq!(other.categories, vec!["Various".to_string()]);
    }
}

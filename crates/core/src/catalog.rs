//! The static product catalog and the filter/sort pipeline over it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::price::MAX_EXPONENT;
use crate::types::{Currency, Price, ProductId};

/// Errors raised while loading a catalog definition.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("invalid catalog definition: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("product id cannot be empty")]
    EmptyId,
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error("product {0} has a negative price")]
    NegativePrice(ProductId),
    #[error("currency exponent {exponent} exceeds the maximum of {max}")]
    UnsupportedExponent { exponent: u32, max: u32 },
}

/// A purchasable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    pub category: String,
    #[serde(default)]
    pub image_ref: String,
}

impl Product {
    /// Text matched by free-text search.
    fn search_haystack(&self) -> String {
        format!("{} {} {}", self.title, self.description, self.category).to_lowercase()
    }
}

/// Ordering applied after filtering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortMode {
    /// Keep catalog order.
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "price-asc")]
    PriceAscending,
    #[serde(rename = "price-desc")]
    PriceDescending,
}

impl SortMode {
    /// All modes in selector order.
    pub const ALL: [Self; 3] = [Self::None, Self::PriceAscending, Self::PriceDescending];

    /// Parse a selector value. Unknown values fall back to [`SortMode::None`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "price-asc" => Self::PriceAscending,
            "price-desc" => Self::PriceDescending,
            _ => Self::None,
        }
    }

    /// The selector value for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::PriceAscending => "price-asc",
            Self::PriceDescending => "price-desc",
        }
    }

    /// Human-readable label for the sort selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Featured",
            Self::PriceAscending => "Price: low to high",
            Self::PriceDescending => "Price: high to low",
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

/// Current state of the search, category and sort controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub sort: SortMode,
}

impl FilterState {
    #[must_use]
    pub fn new(search: impl Into<String>, category: impl Into<String>, sort: SortMode) -> Self {
        Self {
            search: search.into(),
            category: category.into(),
            sort,
        }
    }
}

#[derive(Deserialize)]
struct CatalogFile {
    #[serde(default)]
    currency: Currency,
    products: Vec<Product>,
}

/// The immutable set of products offered by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    currency: Currency,
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, rejecting empty or duplicate ids and negative prices.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] describing the first invalid product.
    pub fn new(currency: Currency, products: Vec<Product>) -> Result<Self, CatalogError> {
        if currency.exponent > MAX_EXPONENT {
            return Err(CatalogError::UnsupportedExponent {
                exponent: currency.exponent,
                max: MAX_EXPONENT,
            });
        }

        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if product.id.as_str().trim().is_empty() {
                return Err(CatalogError::EmptyId);
            }
            if product.price < Price::ZERO {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
            if !seen.insert(product.id.as_str()) {
                return Err(CatalogError::DuplicateId(product.id.clone()));
            }
        }

        Ok(Self { currency, products })
    }

    /// Parse a catalog from its YAML definition.
    ///
    /// ```yaml
    /// currency: { code: INR, symbol: "₹", exponent: 0 }
    /// products:
    ///   - id: p1
    ///     title: Classic T-Shirt
    ///     description: Comfortable cotton tee.
    ///     price: 399
    ///     category: Clothing
    ///     image_ref: images/tshirt.jpg
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Parse`] for malformed YAML, or a validation
    /// error from [`Catalog::new`].
    pub fn from_yaml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(source)?;
        Self::new(file.currency, file.products)
    }

    /// The built-in sample catalog.
    #[must_use]
    pub fn sample() -> Self {
        let product = |id: &str, title: &str, price: i64, category: &str, image: &str, desc: &str| {
            Product {
                id: ProductId::new(id),
                title: title.to_string(),
                description: desc.to_string(),
                price: Price::new(price),
                category: category.to_string(),
                image_ref: format!("images/{image}"),
            }
        };

        Self {
            currency: Currency::inr(),
            products: vec![
                product("p1", "Classic T-Shirt", 399, "Clothing", "tshirt.jpg", "Comfortable cotton tee."),
                product("p2", "Running Shoes", 2499, "Footwear", "shoes.jpg", "Lightweight running shoes."),
                product("p3", "Wireless Headphones", 3499, "Electronics", "headphones.jpg", "Noise-cancelling, long battery."),
                product("p4", "Denim Jacket", 1999, "Clothing", "jacket.jpg", "Stylish denim jacket."),
                product("p5", "Coffee Mug", 249, "Home", "mug.jpg", "Ceramic mug 350ml."),
            ],
        }
    }

    #[must_use]
    pub const fn currency(&self) -> &Currency {
        &self.currency
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look up a product by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_str() == id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Unit price of a product, or zero when the id is unknown.
    #[must_use]
    pub fn price_of(&self, id: &str) -> Price {
        self.get(id).map_or(Price::ZERO, |p| p.price)
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Filter and sort the catalog.
    ///
    /// A product matches the search text when the lowercased concatenation of
    /// its title, description and category contains the trimmed, lowercased
    /// search text. A non-empty category must match exactly. Price sorts are
    /// stable, so ties keep catalog order.
    #[must_use]
    pub fn apply_filters(&self, filter: &FilterState) -> Vec<&Product> {
        let needle = filter.search.trim().to_lowercase();
        let category = filter.category.trim();

        let mut out: Vec<&Product> = self
            .products
            .iter()
            .filter(|p| needle.is_empty() || p.search_haystack().contains(&needle))
            .filter(|p| category.is_empty() || p.category == category)
            .collect();

        match filter.sort {
            SortMode::PriceAscending => out.sort_by_key(|p| p.price),
            SortMode::PriceDescending => out.sort_by(|a, b| b.price.cmp(&a.price)),
            SortMode::None => {}
        }

        out
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::sample()
    }
}

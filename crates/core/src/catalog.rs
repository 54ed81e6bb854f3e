//! Product model and the catalog query engine.
//!
//! The query engine answers "which products match these constraints, in
//! what order, page N". Filters are independent predicates combined with
//! logical AND; sorting is a single stable comparator on the selected key;
//! pagination slices the sorted sequence and clamps at the end. The whole
//! path is pure - it reads a snapshot of the product list and never
//! touches persistence.

use serde::{Deserialize, Serialize};

use crate::types::{Money, ProductId};

/// The fixed set of category labels shown in the storefront filter.
///
/// Category membership is a free-form string matched against this list;
/// nothing enforces that a product's category is one of these labels.
pub const CATEGORY_LABELS: &[&str] = &["mini", "standard", "family", "premium", "office"];

/// A capsule house model in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Price in whole rubles.
    pub price: Money,
    /// Free-text dimensions, e.g. "6.0 x 2.4 x 2.7 m".
    pub dimensions: String,
    /// Guest capacity.
    pub guests: u32,
    /// Long description.
    pub description: String,
    /// Category label, matched against [`CATEGORY_LABELS`].
    pub category: String,
    /// Ordered image URLs.
    pub images: Vec<String>,
    /// Optional promo video URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
    /// Whether the model is currently available to order.
    pub in_stock: bool,
}

/// Category constraint for a catalog query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No category constraint.
    #[default]
    All,
    /// Exact match on the category label.
    Category(String),
}

impl CategoryFilter {
    /// Parse the query-string form: `all` (or empty) means no constraint.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Category(s.to_owned())
        }
    }

    fn matches(&self, product: &Product) -> bool {
        match self {
            Self::All => true,
            Self::Category(label) => product.category == *label,
        }
    }
}

/// A price range from the fixed band list shown in the storefront filter.
///
/// The band list is closed: customers pick a band, they never enter
/// arbitrary min/max values. Bounds are inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceBand {
    /// Up to 1 000 000 ₽.
    To1m,
    /// 1 000 000 - 2 000 000 ₽.
    From1mTo2m,
    /// 2 000 000 - 3 000 000 ₽.
    From2mTo3m,
    /// 3 000 000 ₽ and above.
    Over3m,
}

impl PriceBand {
    /// All bands in display order.
    pub const ALL: [Self; 4] = [Self::To1m, Self::From1mTo2m, Self::From2mTo3m, Self::Over3m];

    /// Inclusive lower and upper bounds of the band.
    #[must_use]
    pub const fn bounds(&self) -> (Money, Money) {
        match self {
            Self::To1m => (Money::ZERO, Money::new(1_000_000)),
            Self::From1mTo2m => (Money::new(1_000_000), Money::new(2_000_000)),
            Self::From2mTo3m => (Money::new(2_000_000), Money::new(3_000_000)),
            Self::Over3m => (Money::new(3_000_000), Money::MAX),
        }
    }

    /// The query-string slug for the band.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::To1m => "to-1m",
            Self::From1mTo2m => "1m-2m",
            Self::From2mTo3m => "2m-3m",
            Self::Over3m => "over-3m",
        }
    }

    /// Parse a band from its slug. Unknown slugs yield `None`, which the
    /// query layer treats as "no price constraint".
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|band| band.slug() == s)
    }

    fn contains(&self, price: Money) -> bool {
        let (min, max) = self.bounds();
        min <= price && price <= max
    }
}

/// Sort order for catalog results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Keep the filter-output order.
    #[default]
    Default,
    /// Price, cheapest first.
    PriceAsc,
    /// Price, most expensive first.
    PriceDesc,
    /// Guest capacity, smallest first.
    GuestsAsc,
    /// Guest capacity, largest first.
    GuestsDesc,
}

impl SortKey {
    /// Parse the query-string form; anything unknown falls back to
    /// [`Default`](Self::Default).
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "price-asc" => Self::PriceAsc,
            "price-desc" => Self::PriceDesc,
            "guests-asc" => Self::GuestsAsc,
            "guests-desc" => Self::GuestsDesc,
            _ => Self::Default,
        }
    }
}

/// A catalog query: filters, sort order, and a 1-based page.
#[derive(Debug, Clone, Default)]
pub struct CatalogQuery {
    /// Category constraint.
    pub category: CategoryFilter,
    /// Optional price band constraint.
    pub price_band: Option<PriceBand>,
    /// Optional exact guest-count constraint.
    pub guests: Option<u32>,
    /// Sort order applied after filtering.
    pub sort: SortKey,
    /// 1-based page number. Page 0 is treated as page 1.
    pub page: usize,
    /// Items per page. Zero yields an empty page.
    pub page_size: usize,
}

/// One page of catalog query results.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogPage {
    /// Products on the requested page, in final order.
    pub products: Vec<Product>,
    /// Total number of products matching the filters, across all pages.
    pub total_matches: usize,
}

impl CatalogQuery {
    /// Run the query over a snapshot of the product list.
    ///
    /// Filters are applied in sequence (category, price band, guest count)
    /// and all must pass. The sort is stable, so ties keep the filter-output
    /// order, and [`SortKey::Default`] preserves it entirely. Pagination
    /// slices `[(page-1)*size, page*size)`; slicing past the end returns an
    /// empty page without ever dividing by the page size.
    #[must_use]
    pub fn run(&self, products: &[Product]) -> CatalogPage {
        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|p| self.category.matches(p))
            .filter(|p| self.price_band.is_none_or(|band| band.contains(p.price)))
            .filter(|p| self.guests.is_none_or(|g| p.guests == g))
            .collect();

        match self.sort {
            SortKey::Default => {}
            SortKey::PriceAsc => matched.sort_by_key(|p| p.price),
            SortKey::PriceDesc => matched.sort_by_key(|p| std::cmp::Reverse(p.price)),
            SortKey::GuestsAsc => matched.sort_by_key(|p| p.guests),
            SortKey::GuestsDesc => matched.sort_by_key(|p| std::cmp::Reverse(p.guests)),
        }

        let total_matches = matched.len();
        let start = self.page.max(1) - 1;
        let products = matched
            .into_iter()
            .skip(start.saturating_mul(self.page_size))
            .take(self.page_size)
            .cloned()
            .collect();

        CatalogPage {
            products,
            total_matches,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i64, category: &str, price: i64, guests: u32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("Capsule {id}"),
            price: Money::new(price),
            dimensions: "6.0 x 2.4 x 2.7 m".to_owned(),
            guests,
            description: String::new(),
            category: category.to_owned(),
            images: vec![],
            video_url: None,
            in_stock: true,
        }
    }

    fn fixture() -> Vec<Product> {
        vec![
            product(1, "mini", 890_000, 2),
            product(2, "standard", 1_450_000, 4),
            product(3, "mini", 990_000, 2),
            product(4, "family", 2_900_000, 6),
            product(5, "mini", 1_200_000, 3),
            product(6, "premium", 3_400_000, 4),
        ]
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let query = CatalogQuery {
            category: CategoryFilter::Category("mini".to_owned()),
            price_band: Some(PriceBand::To1m),
            guests: Some(2),
            page: 1,
            page_size: 10,
            ..CatalogQuery::default()
        };
        let page = query.run(&fixture());

        assert_eq!(page.total_matches, 2);
        for p in &page.products {
            assert_eq!(p.category, "mini");
            assert!(p.price <= Money::new(1_000_000));
            assert_eq!(p.guests, 2);
        }
    }

    #[test]
    fn test_default_sort_preserves_order() {
        let query = CatalogQuery {
            page: 1,
            page_size: 10,
            ..CatalogQuery::default()
        };
        let page = query.run(&fixture());
        let ids: Vec<i64> = page.products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_price_sort_is_nondecreasing_and_stable() {
        let mut products = fixture();
        // Duplicate price to observe stability: id 7 enters after id 3.
        products.push(product(7, "mini", 990_000, 5));

        let query = CatalogQuery {
            sort: SortKey::PriceAsc,
            page: 1,
            page_size: 10,
            ..CatalogQuery::default()
        };
        let page = query.run(&products);

        let prices: Vec<i64> = page.products.iter().map(|p| p.price.as_i64()).collect();
        let mut sorted = prices.clone();
        sorted.sort_unstable();
        assert_eq!(prices, sorted);

        let pos3 = page.products.iter().position(|p| p.id.as_i64() == 3).unwrap();
        let pos7 = page.products.iter().position(|p| p.id.as_i64() == 7).unwrap();
        assert!(pos3 < pos7, "equal prices must keep filter-output order");
    }

    #[test]
    fn test_price_band_bounds_inclusive() {
        let products = vec![
            product(1, "mini", 1_000_000, 2),
            product(2, "mini", 1_000_001, 2),
        ];
        let query = CatalogQuery {
            price_band: Some(PriceBand::To1m),
            page: 1,
            page_size: 10,
            ..CatalogQuery::default()
        };
        let page = query.run(&products);
        assert_eq!(page.total_matches, 1);
        assert_eq!(page.products.first().unwrap().id.as_i64(), 1);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let query = CatalogQuery {
            category: CategoryFilter::Category("sauna".to_owned()),
            page: 1,
            page_size: 10,
            ..CatalogQuery::default()
        };
        let page = query.run(&fixture());
        assert!(page.products.is_empty());
        assert_eq!(page.total_matches, 0);
    }

    #[test]
    fn test_pagination_slices_and_clamps() {
        let query = CatalogQuery {
            page: 2,
            page_size: 4,
            ..CatalogQuery::default()
        };
        let page = query.run(&fixture());
        assert_eq!(page.total_matches, 6);
        let ids: Vec<i64> = page.products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![5, 6]);

        let past_end = CatalogQuery {
            page: 9,
            page_size: 4,
            ..CatalogQuery::default()
        };
        let page = past_end.run(&fixture());
        assert!(page.products.is_empty());
        assert_eq!(page.total_matches, 6);
    }

    #[test]
    fn test_zero_page_size_yields_empty_page() {
        let query = CatalogQuery {
            page: 1,
            page_size: 0,
            ..CatalogQuery::default()
        };
        let page = query.run(&fixture());
        assert!(page.products.is_empty());
        assert_eq!(page.total_matches, 6);
    }

    #[test]
    fn test_page_zero_treated_as_first() {
        let query = CatalogQuery {
            page: 0,
            page_size: 3,
            ..CatalogQuery::default()
        };
        let page = query.run(&fixture());
        let ids: Vec<i64> = page.products.iter().map(|p| p.id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_band_and_sort_parsing() {
        assert_eq!(PriceBand::parse("to-1m"), Some(PriceBand::To1m));
        assert_eq!(PriceBand::parse("over-3m"), Some(PriceBand::Over3m));
        assert_eq!(PriceBand::parse("0-999"), None);

        assert_eq!(SortKey::parse("price-desc"), SortKey::PriceDesc);
        assert_eq!(SortKey::parse("anything"), SortKey::Default);

        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::parse("mini"),
            CategoryFilter::Category("mini".to_owned())
        );
    }
}

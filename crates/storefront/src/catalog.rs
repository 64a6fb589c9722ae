//! Catalog filtering.
//!
//! The product list is fetched once per session and filtered locally: by
//! case-insensitive name substring and by category, where "uncategorized"
//! is a selectable pseudo-category.

use mercadito_core::CategoryId;

use crate::backend::types::Product;

/// Label shown for products with no category.
pub const UNCATEGORIZED_LABEL: &str = "Sin Categoría";

/// The category axis of the catalog filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Every product.
    #[default]
    All,
    /// Only products in one specific category.
    Only(CategoryId),
    /// Only products with no category.
    Uncategorized,
}

/// A catalog filter: free-text search plus a category selection.
#[derive(Debug, Clone, Default)]
pub struct CatalogFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl CatalogFilter {
    /// Whether a product passes the filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let matches_search = self.search.is_empty()
            || product
                .name
                .to_lowercase()
                .contains(&self.search.to_lowercase());

        let matches_category = match self.category {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => product.category_id == Some(id),
            CategoryFilter::Uncategorized => product.category_id.is_none(),
        };

        matches_search && matches_category
    }

    /// Apply the filter to a product list, preserving order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }
}

/// Display name for a product's category ("Sin Categoría" when absent).
#[must_use]
pub fn category_label(product: &Product) -> &str {
    product
        .category_name
        .as_deref()
        .unwrap_or(UNCATEGORIZED_LABEL)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mercadito_core::ProductId;
    use rust_decimal::dec;

    fn product(id: i64, name: &str, category: Option<i64>) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_owned(),
            price: dec!(1.00),
            stock: 10,
            image_url: None,
            category_id: category.map(CategoryId::new),
            category_name: category.map(|c| format!("cat-{c}")),
        }
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let products = vec![
            product(1, "Leche Entera 1L", Some(1)),
            product(2, "Pan Integral", Some(2)),
            product(3, "leche descremada", Some(1)),
        ];

        let filter = CatalogFilter {
            search: "LECHE".to_owned(),
            category: CategoryFilter::All,
        };
        let hits = filter.apply(&products);
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|p| p.name.to_lowercase().contains("leche")));
    }

    #[test]
    fn category_filter_narrows_results() {
        let products = vec![
            product(1, "Leche", Some(1)),
            product(2, "Pan", Some(2)),
            product(3, "Tomates", None),
        ];

        let only_dairy = CatalogFilter {
            search: String::new(),
            category: CategoryFilter::Only(CategoryId::new(1)),
        };
        assert_eq!(only_dairy.apply(&products).len(), 1);

        let uncategorized = CatalogFilter {
            search: String::new(),
            category: CategoryFilter::Uncategorized,
        };
        let hits = uncategorized.apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ProductId::new(3));
    }

    #[test]
    fn both_axes_must_match() {
        let products = vec![
            product(1, "Leche Entera", Some(1)),
            product(2, "Leche en Polvo", Some(2)),
        ];
        let filter = CatalogFilter {
            search: "leche".to_owned(),
            category: CategoryFilter::Only(CategoryId::new(2)),
        };
        let hits = filter.apply(&products);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, ProductId::new(2));
    }

    #[test]
    fn default_filter_passes_everything() {
        let products = vec![product(1, "a", None), product(2, "b", Some(9))];
        assert_eq!(CatalogFilter::default().apply(&products).len(), 2);
    }

    #[test]
    fn missing_category_renders_placeholder() {
        let with = product(1, "Leche", Some(1));
        let without = product(2, "Tomates", None);
        assert_eq!(category_label(&with), "cat-1");
        assert_eq!(category_label(&without), UNCATEGORIZED_LABEL);
    }
}

//! Collection page queries: filtering, sorting and the home page shelves.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Catalog;
use crate::models::Product;

const BESTSELLER_LIMIT: usize = 5;
const LATEST_LIMIT: usize = 10;
const RELATED_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SortType {
    /// Catalog order.
    #[default]
    Relevant,
    LowHigh,
    HighLow,
}

#[derive(Debug, Clone, Default)]
pub struct CollectionQuery {
    /// Empty means any category.
    pub categories: Vec<String>,
    pub sub_categories: Vec<String>,
    pub search: Option<String>,
    pub sort: SortType,
}

impl CollectionQuery {
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut products: Vec<&Product> = catalog
            .products()
            .iter()
            .filter(|p| self.categories.is_empty() || self.categories.contains(&p.category))
            .filter(|p| {
                self.sub_categories.is_empty() || self.sub_categories.contains(&p.sub_category)
            })
            .filter(|p| match &needle {
                Some(needle) => p.name.to_lowercase().contains(needle),
                None => true,
            })
            .collect();

        match self.sort {
            SortType::Relevant => {}
            SortType::LowHigh => products.sort_by(|a, b| a.price.cmp(&b.price)),
            SortType::HighLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        products
    }
}

pub fn bestsellers(catalog: &Catalog) -> Vec<&Product> {
    catalog
        .products()
        .iter()
        .filter(|p| p.bestseller)
        .take(BESTSELLER_LIMIT)
        .collect()
}

pub fn latest(catalog: &Catalog) -> Vec<&Product> {
    catalog.products().iter().take(LATEST_LIMIT).collect()
}

/// Other products from the same category and sub-category.
pub fn related<'a>(catalog: &'a Catalog, product: &Product) -> Vec<&'a Product> {
    catalog
        .products()
        .iter()
        .filter(|p| {
            p.id != product.id
                && p.category == product.category
                && p.sub_category == product.sub_category
        })
        .take(RELATED_LIMIT)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::tests::product;

    fn item(id: &str, price: i64, category: &str, sub: &str, name: &str) -> Product {
        let mut p = product(id, price);
        p.category = category.into();
        p.sub_category = sub.into();
        p.name = name.into();
        p
    }

    fn catalog() -> Catalog {
        Catalog::from_products(vec![
            item("a", 100, "Women", "Topwear", "Women Round Neck Cotton Top"),
            item("b", 200, "Men", "Topwear", "Men Round Neck Pure Cotton T-shirt"),
            item("c", 220, "Kids", "Topwear", "Girls Round Neck Cotton Top"),
            item("d", 110, "Men", "Bottomwear", "Men Tapered Fit Trousers"),
            item("e", 130, "Women", "Winterwear", "Women Zip-Front Jacket"),
        ])
    }

    fn ids(products: &[&Product]) -> Vec<String> {
        products.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn empty_query_keeps_catalog_order() {
        let catalog = catalog();
        let result = CollectionQuery::default().apply(&catalog);
        assert_eq!(ids(&result), ["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn filters_are_conjunctive() {
        let catalog = catalog();
        let query = CollectionQuery {
            categories: vec!["Men".into(), "Women".into()],
            sub_categories: vec!["Topwear".into()],
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&catalog)), ["a", "b"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = catalog();
        let query = CollectionQuery {
            search: Some("  COTTON ".into()),
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&catalog)), ["a", "b", "c"]);
    }

    #[test]
    fn sorts_by_price() {
        let catalog = catalog();
        let mut query = CollectionQuery {
            sort: SortType::LowHigh,
            ..Default::default()
        };
        assert_eq!(ids(&query.apply(&catalog)), ["a", "d", "e", "b", "c"]);

        query.sort = SortType::HighLow;
        assert_eq!(ids(&query.apply(&catalog)), ["c", "b", "e", "d", "a"]);
    }

    #[test]
    fn sort_type_uses_kebab_case() {
        let sort: SortType = serde_json::from_str("\"low-high\"").unwrap();
        assert_eq!(sort, SortType::LowHigh);
    }

    #[test]
    fn shelves() {
        let mut products: Vec<Product> = (0..12)
            .map(|i| {
                let mut p = product(&format!("p{i}"), 10);
                p.bestseller = i % 2 == 0;
                p
            })
            .collect();
        products[0].category = "Kids".into();
        let catalog = Catalog::from_products(products);

        assert_eq!(ids(&bestsellers(&catalog)), ["p0", "p2", "p4", "p6", "p8"]);
        assert_eq!(latest(&catalog).len(), 10);

        let base = catalog.get("p1").unwrap();
        let related_ids = ids(&related(&catalog, base));
        assert_eq!(related_ids, ["p2", "p3", "p4", "p5", "p6"]);
    }
}

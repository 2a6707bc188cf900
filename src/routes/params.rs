use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::catalog::{CollectionQuery, SortType};

#[derive(Debug, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Collection page filters. List-valued filters are comma separated,
/// e.g. `?category=Men,Women&sort=low-high`.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20
    pub per_page: Option<i64>,
    /// Comma separated categories
    pub category: Option<String>,
    /// Comma separated sub-categories
    pub sub_category: Option<String>,
    /// Case-insensitive name search
    pub q: Option<String>,
    pub sort: Option<SortType>,
}

impl ProductQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn collection(&self) -> CollectionQuery {
        CollectionQuery {
            categories: split_list(self.category.as_deref()),
            sub_categories: split_list(self.sub_category.as_deref()),
            search: self.q.clone(),
            sort: self.sort.unwrap_or_default(),
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_clamps_and_offsets() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.normalize(), (1, 100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: None,
        };
        assert_eq!(p.normalize(), (3, 20, 40));
    }

    #[test]
    fn collection_splits_lists() {
        let query = ProductQuery {
            category: Some("Men, Women,,".into()),
            sort: Some(SortType::HighLow),
            ..Default::default()
        };
        let collection = query.collection();
        assert_eq!(collection.categories, vec!["Men", "Women"]);
        assert!(collection.sub_categories.is_empty());
        assert_eq!(collection.sort, SortType::HighLow);
    }
}

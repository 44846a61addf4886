// API routes and handlers

pub mod categories;
pub mod health;
pub mod meals;
pub mod nutrition;
pub mod routes;
pub mod settings;
pub mod summary;
pub mod templates;
pub mod workouts;

use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    /// Maximum number of items to return (default: 50, max: 100)
    pub limit: Option<i64>,
    /// Number of items to skip (default: 0)
    pub offset: Option<i64>,
}

impl PaginationQuery {
    pub fn get_limit(&self) -> i64 {
        self.limit.unwrap_or(50).clamp(1, 100)
    }

    pub fn get_offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_clamps() {
        let query = PaginationQuery::default();
        assert_eq!(query.get_limit(), 50);
        assert_eq!(query.get_offset(), 0);

        let query = PaginationQuery {
            limit: Some(500),
            offset: Some(-3),
        };
        assert_eq!(query.get_limit(), 100);
        assert_eq!(query.get_offset(), 0);

        let query = PaginationQuery {
            limit: Some(0),
            offset: Some(20),
        };
        assert_eq!(query.get_limit(), 1);
        assert_eq!(query.get_offset(), 20);
    }
}

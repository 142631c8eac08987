//! Window-function statements behind the analytical product views.
//!
//! Products are ranked inside their category by price (highest first, lower
//! id wins ties) and counted per category in one inner query; the outer
//! query filters on the rank and applies the view's ordering.

use sea_orm::sea_query::{
    Alias, Asterisk, Expr, Func, Order, Query, SelectStatement, WindowStatement,
};

use super::entities::{category, product};

/// Position of a product inside its category, by price
pub const RANK_COLUMN: &str = "price_rank";

/// Number of products in the product's category
pub const COUNT_COLUMN: &str = "category_product_count";

/// Category name carried alongside each product row
pub const CATEGORY_NAME_COLUMN: &str = "category_name";

const RANKED: &str = "ranked";

/// Ranked product views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankedView {
    /// `limit` most expensive per category, with category counts, by id
    TopPerCategory { limit: u32 },
    /// `limit` most expensive per category, by category name then price
    TopByCategoryName { limit: u32 },
    /// Every product with its category count, by price
    WithCategoryCounts,
}

impl RankedView {
    /// Whether the view exposes the per-category count
    pub fn annotates_count(&self) -> bool {
        !matches!(self, RankedView::TopByCategoryName { .. })
    }

    /// Full statement for the view, without pagination
    pub fn statement(&self) -> SelectStatement {
        let mut stmt = Query::select();
        stmt.column(Asterisk)
            .from_subquery(ranked_products(), Alias::new(RANKED));

        match *self {
            RankedView::TopPerCategory { limit } => {
                stmt.and_where(ranked_col(RANK_COLUMN).lte(i64::from(limit)))
                    .order_by(ranked(product::Column::Id), Order::Asc);
            }
            RankedView::TopByCategoryName { limit } => {
                stmt.and_where(ranked_col(RANK_COLUMN).lte(i64::from(limit)))
                    .order_by((Alias::new(RANKED), Alias::new(CATEGORY_NAME_COLUMN)), Order::Asc)
                    .order_by(ranked(product::Column::CategoryId), Order::Asc)
                    .order_by(ranked(product::Column::Price), Order::Desc)
                    .order_by(ranked(product::Column::Id), Order::Asc);
            }
            RankedView::WithCategoryCounts => {
                stmt.order_by(ranked(product::Column::Price), Order::Desc)
                    .order_by(ranked(product::Column::Id), Order::Asc);
            }
        }

        stmt
    }

    /// `SELECT COUNT(*)` over the view
    pub fn count_statement(&self) -> SelectStatement {
        Query::select()
            .expr_as(Expr::col(Asterisk).count(), Alias::new("num_items"))
            .from_subquery(self.statement(), Alias::new("listing"))
            .to_owned()
    }

    /// One page of the view
    pub fn page_statement(&self, limit: u64, offset: u64) -> SelectStatement {
        let mut stmt = self.statement();
        stmt.limit(limit).offset(offset);
        stmt
    }
}

/// Product columns plus category name, rank and per-category count
fn ranked_products() -> SelectStatement {
    let by_category = WindowStatement::partition_by((product::Entity, product::Column::CategoryId));

    let mut by_price = by_category.clone();
    by_price
        .order_by((product::Entity, product::Column::Price), Order::Desc)
        .order_by((product::Entity, product::Column::Id), Order::Asc);

    Query::select()
        .columns([
            (product::Entity, product::Column::Id),
            (product::Entity, product::Column::Name),
            (product::Entity, product::Column::CategoryId),
            (product::Entity, product::Column::Price),
            (product::Entity, product::Column::CreatedAt),
        ])
        .expr_as(
            Expr::col((category::Entity, category::Column::Name)),
            Alias::new(CATEGORY_NAME_COLUMN),
        )
        .expr_window_as(
            Func::cust(Alias::new("ROW_NUMBER")),
            by_price,
            Alias::new(RANK_COLUMN),
        )
        .expr_window_as(
            Func::count(Expr::col((product::Entity, product::Column::Id))),
            by_category,
            Alias::new(COUNT_COLUMN),
        )
        .from(product::Entity)
        .inner_join(
            category::Entity,
            Expr::col((category::Entity, category::Column::Id))
                .equals((product::Entity, product::Column::CategoryId)),
        )
        .to_owned()
}

fn ranked(column: product::Column) -> (Alias, product::Column) {
    (Alias::new(RANKED), column)
}

fn ranked_col(name: &str) -> Expr {
    Expr::col((Alias::new(RANKED), Alias::new(name)))
}

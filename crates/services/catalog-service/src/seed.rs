//! Sample catalog data for local runs and load tests.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set,
    TransactionTrait,
};
use tracing::info;

use common::AppResult;

use crate::repository::entities::{category, product};

/// Default number of categories created
pub const DEFAULT_CATEGORIES: u32 = 5;

/// Default number of products created per category
pub const DEFAULT_PRODUCTS_PER_CATEGORY: u32 = 20;

const WORDS: &[&str] = &[
    "quality", "modern", "classic", "durable", "light", "compact", "smart", "premium", "daily",
    "essential", "fresh", "bold", "simple", "reliable", "portable", "handmade", "vintage",
    "eco", "soft", "bright", "range", "collection", "goods", "selection", "items", "series",
];

/// What a generator run inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: u64,
    pub products: u64,
}

/// Insert `categories` categories with `per_category` products each, in one
/// transaction. Names continue from the rows already present.
pub async fn generate(
    db: &DatabaseConnection,
    categories: u32,
    per_category: u32,
) -> AppResult<SeedSummary> {
    let mut rng = StdRng::from_entropy();
    let txn = db.begin().await?;

    let mut category_seq = category::Entity::find().count(&txn).await?;
    let mut product_seq = product::Entity::find().count(&txn).await?;
    let mut summary = SeedSummary {
        categories: 0,
        products: 0,
    };

    for _ in 0..categories {
        let description = sentence(&mut rng);
        let category_id =
            insert_category(&txn, &format!("Category {}", category_seq), &description).await?;
        category_seq += 1;
        summary.categories += 1;

        for _ in 0..per_category {
            let price = Decimal::new(rng.gen_range(1..=999_999), 2);
            insert_product(&txn, &format!("Product {}", product_seq), category_id, price).await?;
            product_seq += 1;
            summary.products += 1;
        }
    }

    txn.commit().await?;

    info!(
        categories = summary.categories,
        products = summary.products,
        "Generated catalog data"
    );
    Ok(summary)
}

/// Insert one category and return its ID
pub async fn insert_category<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    description: &str,
) -> AppResult<i32> {
    let model = category::ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.to_string()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model.id)
}

/// Insert one product, created now, and return its ID
pub async fn insert_product<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    category_id: i32,
    price: Decimal,
) -> AppResult<i32> {
    let model = product::ActiveModel {
        name: Set(name.to_string()),
        category_id: Set(category_id),
        price: Set(price),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model.id)
}

fn sentence(rng: &mut StdRng) -> String {
    let len = rng.gen_range(4..=9);
    let words: Vec<&str> = (0..len)
        .filter_map(|_| WORDS.choose(rng).copied())
        .collect();
    format!("{}.", capitalize(&words.join(" ")))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentence_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let text = sentence(&mut rng);

        assert!(text.ends_with('.'));
        assert!(text.chars().next().unwrap().is_uppercase());
        assert!(text.split(' ').count() >= 4);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("quality"), "Quality");
        assert_eq!(capitalize(""), "");
    }
}

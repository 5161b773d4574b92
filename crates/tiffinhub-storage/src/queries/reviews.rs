// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Review persistence and the provider-rating recompute.
//!
//! `recompute_provider_rating` is the only writer of the derived
//! `service_providers.rating` column; callers invoke it after the two
//! mutations that can affect it (review create, admin review delete).

use rusqlite::{Row, params, params_from_iter, types::Value};

use tiffinhub_core::types::Page;
use tiffinhub_core::{HubError, Review};

use crate::database::Database;
use crate::models::{RatingBucket, ReviewStats, ReviewWithParties};

const REVIEW_COLUMNS: &str = "r.id, r.consumer_id, r.provider_id, r.order_id, r.rating, \
                              r.comment, r.is_verified, r.created_at, r.updated_at";

const REVIEW_JOINS: &str = " FROM reviews r \
                            JOIN users c ON c.id = r.consumer_id \
                            JOIN service_providers p ON p.id = r.provider_id \
                            JOIN orders o ON o.id = r.order_id";

fn map_review(row: &Row<'_>) -> Result<Review, rusqlite::Error> {
    Ok(Review {
        id: row.get(0)?,
        consumer_id: row.get(1)?,
        provider_id: row.get(2)?,
        order_id: row.get(3)?,
        rating: row.get(4)?,
        comment: row.get(5)?,
        is_verified: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn map_review_with_parties(row: &Row<'_>) -> Result<ReviewWithParties, rusqlite::Error> {
    Ok(ReviewWithParties {
        review: map_review(row)?,
        consumer_name: row.get(9)?,
        provider_business_name: row.get(10)?,
        order_total_amount: row.get(11)?,
        order_created_at: row.get(12)?,
    })
}

/// Insert a new review. The (consumer, order) pair is unique; a duplicate
/// surfaces as a `Validation` error.
pub async fn create_review(db: &Database, review: &Review) -> Result<(), HubError> {
    let review = review.clone();
    let result = db
        .connection()
        .call(move |conn| {
            let existing: i64 = conn.query_row(
                "SELECT COUNT(*) FROM reviews WHERE consumer_id = ?1 AND order_id = ?2",
                params![review.consumer_id, review.order_id],
                |row| row.get(0),
            )?;
            if existing > 0 {
                return Ok(false);
            }
            conn.execute(
                "INSERT INTO reviews (id, consumer_id, provider_id, order_id, rating, comment, \
                 is_verified, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                params![
                    review.id,
                    review.consumer_id,
                    review.provider_id,
                    review.order_id,
                    review.rating,
                    review.comment,
                    review.is_verified,
                    review.created_at,
                    review.updated_at,
                ],
            )?;
            Ok(true)
        })
        .await
        .map_err(crate::database::map_tr_err)?;
    if !result {
        return Err(HubError::Validation(
            "a review already exists for this order".to_string(),
        ));
    }
    Ok(())
}

/// Listing filters.
#[derive(Debug, Clone, Default)]
pub struct ReviewFilter {
    pub provider_id: Option<String>,
    pub consumer_id: Option<String>,
    pub rating: Option<i64>,
}

/// List reviews newest first with display fields of all three referenced
/// records.
pub async fn list_reviews(
    db: &Database,
    filter: ReviewFilter,
    page: u32,
    limit: u32,
    offset: u64,
) -> Result<Page<ReviewWithParties>, HubError> {
    db.connection()
        .call(move |conn| {
            let mut clause = String::from(" WHERE 1=1");
            let mut filter_params: Vec<Value> = Vec::new();
            if let Some(provider_id) = filter.provider_id {
                clause.push_str(" AND r.provider_id = ?");
                filter_params.push(provider_id.into());
            }
            if let Some(consumer_id) = filter.consumer_id {
                clause.push_str(" AND r.consumer_id = ?");
                filter_params.push(consumer_id.into());
            }
            if let Some(rating) = filter.rating {
                clause.push_str(" AND r.rating = ?");
                filter_params.push(rating.into());
            }

            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM reviews r{clause}"),
                params_from_iter(filter_params.iter()),
                |row| row.get(0),
            )?;

            let mut stmt = conn.prepare(&format!(
                "SELECT {REVIEW_COLUMNS}, c.name, p.business_name, o.total_amount, o.created_at\
                 {REVIEW_JOINS}{clause} ORDER BY r.created_at DESC LIMIT ? OFFSET ?"
            ))?;
            let mut all_params = filter_params;
            all_params.push(i64::from(limit).into());
            all_params.push((offset as i64).into());
            let rows =
                stmt.query_map(params_from_iter(all_params.iter()), map_review_with_parties)?;
            let mut reviews = Vec::new();
            for row in rows {
                reviews.push(row?);
            }
            Ok(Page::new(reviews, page, limit, total as u64))
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete a review (admin back-office). Returns the provider id for the
/// rating recompute, or `None` if the id does not resolve.
pub async fn delete_review(db: &Database, id: &str) -> Result<Option<String>, HubError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let provider_id: Option<String> = match tx.query_row(
                "SELECT provider_id FROM reviews WHERE id = ?1",
                params![id],
                |row| row.get(0),
            ) {
                Ok(provider_id) => Some(provider_id),
                Err(rusqlite::Error::QueryReturnedNoRows) => None,
                Err(e) => return Err(e.into()),
            };
            if provider_id.is_some() {
                tx.execute("DELETE FROM reviews WHERE id = ?1", params![id])?;
            }
            tx.commit()?;
            Ok(provider_id)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Recompute a provider's rating as the mean of its reviews' ratings,
/// rounded to one decimal place. A provider with no reviews gets 0.0.
pub async fn recompute_provider_rating(db: &Database, provider_id: &str) -> Result<f64, HubError> {
    let provider_id = provider_id.to_string();
    db.connection()
        .call(move |conn| {
            let tx = conn.transaction()?;
            let average: Option<f64> = tx.query_row(
                "SELECT AVG(rating) FROM reviews WHERE provider_id = ?1",
                params![provider_id],
                |row| row.get(0),
            )?;
            let rating = average.map_or(0.0, |avg| (avg * 10.0).round() / 10.0);
            tx.execute(
                "UPDATE service_providers SET rating = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?2",
                params![rating, provider_id],
            )?;
            tx.commit()?;
            Ok(rating)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Aggregate statistics across all reviews, with the 1-5 histogram.
pub async fn stats(db: &Database) -> Result<ReviewStats, HubError> {
    db.connection()
        .call(move |conn| {
            let (average, total): (Option<f64>, i64) = conn.query_row(
                "SELECT AVG(rating), COUNT(*) FROM reviews",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;

            let mut stmt =
                conn.prepare("SELECT rating, COUNT(*) FROM reviews GROUP BY rating")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?;
            let mut counts = std::collections::HashMap::new();
            for row in rows {
                let (rating, count) = row?;
                counts.insert(rating, count);
            }
            let rating_distribution = (1..=5)
                .map(|rating| RatingBucket {
                    rating,
                    count: counts.get(&rating).copied().unwrap_or(0),
                })
                .collect();

            Ok(ReviewStats {
                average_rating: average.unwrap_or(0.0),
                total_reviews: total,
                rating_distribution,
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

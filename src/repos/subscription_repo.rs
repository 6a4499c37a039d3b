/*
 * Responsibility
 * - Persist / delete push subscriptions (notification_subscriptions table)
 * - The payload is opaque: stored as jsonb, never inspected here
 * - Handlers only see the `SubscriptionStore` trait so tests can swap the backend
 */
use std::{fmt, str::FromStr};

use async_trait::async_trait;
use serde::Serialize;
use sqlx::{PgPool, types::Json};

use crate::repos::error::RepoError;
use crate::services::auth::UserId;

/// Store-generated identifier of a subscription.
///
/// Serialized as a JSON number and written to the `subscription_id` cookie in decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionId(i64);

impl SubscriptionId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubscriptionId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Store `payload` for `user_id`.
    //
    // Returns:
    // - Ok(Some(id)) => stored
    // - Ok(None)     => backend accepted the call but produced no id
    async fn create(
        &self,
        user_id: &UserId,
        payload: &serde_json::Value,
    ) -> Result<Option<SubscriptionId>, RepoError>;

    // Delete a subscription. Returns the number of rows removed.
    async fn remove(&self, id: SubscriptionId) -> Result<u64, RepoError>;
}

#[derive(Clone, Debug)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(
        &self,
        user_id: &UserId,
        payload: &serde_json::Value,
    ) -> Result<Option<SubscriptionId>, RepoError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO notification_subscriptions (user_id, subscription)
            VALUES ($1, $2)
            RETURNING id
            "#,
        )
        .bind(user_id.as_str())
        .bind(Json(payload))
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(SubscriptionId::new))
    }

    async fn remove(&self, id: SubscriptionId) -> Result<u64, RepoError> {
        let result = sqlx::query(
            r#"
            DELETE FROM notification_subscriptions
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscription_id_round_trips_through_cookie_text() {
        let id: SubscriptionId = " 42 ".parse().unwrap();
        assert_eq!(id, SubscriptionId::new(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<SubscriptionId>().is_err());
        assert!("".parse::<SubscriptionId>().is_err());
    }

    #[test]
    fn subscription_id_serializes_as_number() {
        let json = serde_json::to_value(SubscriptionId::new(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }
}

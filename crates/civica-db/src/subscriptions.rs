use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use civica_data::{Insert, Query, Retrieve, Subscription, SubscriptionFilter, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Subscription> for Connection {
    type Filter = SubscriptionFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Subscription>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                member_id,
                amount,
                billing_day,
                next_charge_date,
                state,
                cancelled_at,
                card_last_digits
            FROM subscriptions
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(state) = filter.state {
            qry.push(" AND state = ").push_bind(state);
        }

        let subscriptions: Vec<Subscription> =
            qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(subscriptions)
    }
}

#[async_trait]
impl Retrieve<Subscription> for Connection {
    type Key = u32;
    async fn retrieve(&self, subscription_id: Self::Key) -> Result<Subscription> {
        let filter = SubscriptionFilter {
            id: Some(subscription_id),
            ..Default::default()
        };
        let subscription = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(subscription)
    }
}

#[async_trait]
impl Insert<Subscription> for Connection {
    async fn insert(&self, subscription: Subscription) -> Result<Subscription> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO subscriptions (
                    member_id,
                    amount,
                    billing_day,
                    next_charge_date,
                    state,
                    cancelled_at,
                    card_last_digits
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(subscription.member_id)
                .push_bind(subscription.amount.to_string())
                .push_bind(subscription.billing_day)
                .push_bind(subscription.next_charge_date)
                .push_bind(subscription.state)
                .push_bind(subscription.cancelled_at)
                .push_bind(&subscription.card_last_digits);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Subscription> for Connection {
    /// Update subscription
    async fn update(&self, subscription: Subscription) -> Result<Subscription> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE subscriptions SET")
                .push(" member_id = ")
                .push_bind(subscription.member_id)
                .push(", amount = ")
                .push_bind(subscription.amount.to_string())
                .push(", billing_day = ")
                .push_bind(subscription.billing_day)
                .push(", next_charge_date = ")
                .push_bind(subscription.next_charge_date)
                .push(", state = ")
                .push_bind(subscription.state)
                .push(", cancelled_at = ")
                .push_bind(subscription.cancelled_at)
                .push(", card_last_digits = ")
                .push_bind(&subscription.card_last_digits)
                .push(" WHERE id = ")
                .push_bind(subscription.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(subscription.id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    use civica_data::{Member, SubscriptionState};

    async fn seed_member(db: &Connection) -> Member {
        db.insert(Member {
            name: "Socio suscrito".to_string(),
            email: "suscrito@civica.test".to_string(),
            ..Member::default()
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_subscription_insert() {
        let db = Connection::open_test().await;
        let member = seed_member(&db).await;

        let subscription = db
            .insert(Subscription {
                member_id: member.id,
                amount: "200.00".parse().unwrap(),
                billing_day: 15,
                next_charge_date: NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
                card_last_digits: "4242".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(subscription.member_id, member.id);
        assert_eq!(subscription.amount, Decimal::new(20000, 2));
        assert_eq!(subscription.billing_day, 15);
        assert_eq!(subscription.state, SubscriptionState::Active);
        assert_eq!(subscription.cancelled_at, None);
    }

    #[tokio::test]
    async fn test_subscription_cancel() {
        let db = Connection::open_test().await;
        let member = seed_member(&db).await;

        let subscription = db
            .insert(Subscription {
                member_id: member.id,
                amount: "150".parse().unwrap(),
                billing_day: 1,
                next_charge_date: NaiveDate::from_ymd_opt(2024, 8, 1).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();

        let cancelled_at = Utc.with_ymd_and_hms(2024, 7, 20, 16, 0, 0).unwrap();
        let subscription = db
            .update(Subscription {
                state: SubscriptionState::Cancelled,
                cancelled_at: Some(cancelled_at),
                ..subscription
            })
            .await
            .unwrap();

        assert_eq!(subscription.state, SubscriptionState::Cancelled);
        assert_eq!(subscription.cancelled_at, Some(cancelled_at));

        let active: Vec<Subscription> = db
            .query(&SubscriptionFilter {
                member_id: Some(member.id),
                state: Some(SubscriptionState::Active),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(active.is_empty());
    }
}

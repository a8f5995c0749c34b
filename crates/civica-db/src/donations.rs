use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use civica_data::{Donation, DonationFilter, Insert, Query, Retrieve, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Donation> for Connection {
    type Filter = DonationFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Donation>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                member_id,
                donor_name,
                donor_email,
                amount,
                currency,
                kind,
                payment_status,
                occurred_at,
                description
            FROM donations
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(member_id) = filter.member_id {
            qry.push(" AND member_id = ").push_bind(member_id);
        }
        if let Some(kind) = filter.kind {
            qry.push(" AND kind = ").push_bind(kind);
        }
        if let Some(payment_status) = filter.payment_status {
            qry.push(" AND payment_status = ").push_bind(payment_status);
        }
        if let Some(occurred_before) = filter.occurred_before {
            qry.push(" AND occurred_at <= ").push_bind(occurred_before);
        }
        if let Some(occurred_after) = filter.occurred_after {
            qry.push(" AND occurred_at >= ").push_bind(occurred_after);
        }
        qry.push(" ORDER BY occurred_at DESC ");

        let donations: Vec<Donation> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(donations)
    }
}

#[async_trait]
impl Retrieve<Donation> for Connection {
    type Key = u32;
    async fn retrieve(&self, donation_id: Self::Key) -> Result<Donation> {
        let filter = DonationFilter {
            id: Some(donation_id),
            ..Default::default()
        };
        let donation = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(donation)
    }
}

#[async_trait]
impl Insert<Donation> for Connection {
    async fn insert(&self, donation: Donation) -> Result<Donation> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO donations (
                    member_id,
                    donor_name,
                    donor_email,
                    amount,
                    currency,
                    kind,
                    payment_status,
                    occurred_at,
                    description
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(donation.member_id)
                .push_bind(&donation.donor_name)
                .push_bind(&donation.donor_email)
                .push_bind(donation.amount.to_string())
                .push_bind(&donation.currency)
                .push_bind(donation.kind)
                .push_bind(donation.payment_status)
                .push_bind(donation.occurred_at)
                .push_bind(&donation.description);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Donation> for Connection {
    /// Update donation; in practice only the payment status moves.
    async fn update(&self, donation: Donation) -> Result<Donation> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE donations SET")
                .push(" member_id = ")
                .push_bind(donation.member_id)
                .push(", donor_name = ")
                .push_bind(&donation.donor_name)
                .push(", donor_email = ")
                .push_bind(&donation.donor_email)
                .push(", amount = ")
                .push_bind(donation.amount.to_string())
                .push(", currency = ")
                .push_bind(&donation.currency)
                .push(", kind = ")
                .push_bind(donation.kind)
                .push(", payment_status = ")
                .push_bind(donation.payment_status)
                .push(", occurred_at = ")
                .push_bind(donation.occurred_at)
                .push(", description = ")
                .push_bind(&donation.description)
                .push(" WHERE id = ")
                .push_bind(donation.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(donation.id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;

    use civica_data::PaymentStatus;

    #[tokio::test]
    async fn test_donation_amount_round_trip() {
        let db = Connection::open_test().await;
        let donation = db
            .insert(Donation {
                donor_name: "Donante".to_string(),
                donor_email: "donante@civica.test".to_string(),
                amount: "123.45".parse().unwrap(),
                currency: "MXN".to_string(),
                occurred_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
                description: "Donación única para Apoyo General".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(donation.amount, Decimal::new(12345, 2));
        assert_eq!(donation.currency, "MXN");
        assert_eq!(donation.payment_status, PaymentStatus::Pending);
        assert_eq!(donation.member_id, None);
    }

    #[tokio::test]
    async fn test_donation_query_by_status() {
        let db = Connection::open_test().await;
        db.insert(Donation {
            amount: "100".parse().unwrap(),
            payment_status: PaymentStatus::Completed,
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
            ..Default::default()
        })
        .await
        .unwrap();
        db.insert(Donation {
            amount: "50".parse().unwrap(),
            payment_status: PaymentStatus::Pending,
            occurred_at: Utc.with_ymd_and_hms(2024, 1, 16, 9, 0, 0).unwrap(),
            ..Default::default()
        })
        .await
        .unwrap();

        let completed: Vec<Donation> = db
            .query(&DonationFilter {
                payment_status: Some(PaymentStatus::Completed),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].amount, Decimal::new(100, 0));
    }

    #[tokio::test]
    async fn test_donation_status_update() {
        let db = Connection::open_test().await;
        let donation = db
            .insert(Donation {
                amount: "75.50".parse().unwrap(),
                occurred_at: Utc.with_ymd_and_hms(2024, 2, 2, 10, 30, 0).unwrap(),
                ..Default::default()
            })
            .await
            .unwrap();

        let donation = db
            .update(Donation {
                payment_status: PaymentStatus::Completed,
                ..donation
            })
            .await
            .unwrap();
        assert_eq!(donation.payment_status, PaymentStatus::Completed);
        assert_eq!(donation.amount, Decimal::new(7550, 2));
    }
}

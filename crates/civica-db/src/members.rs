use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use civica_data::{Delete, Insert, Member, MemberFilter, Query, Retrieve, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<Member> for Connection {
    type Filter = MemberFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<Member>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                name,
                email,
                phone,
                notes,
                joined_at,
                status
            FROM members
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(name) = filter.name.clone() {
            qry.push(" AND name LIKE ").push_bind(format!("%{}%", name));
        }
        if let Some(email) = filter.email.clone() {
            qry.push(" AND email LIKE ").push_bind(email);
        }
        if let Some(status) = filter.status {
            qry.push(" AND status = ").push_bind(status);
        }

        let members: Vec<Member> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(members)
    }
}

#[async_trait]
impl Retrieve<Member> for Connection {
    type Key = u32;
    async fn retrieve(&self, member_id: Self::Key) -> Result<Member> {
        let filter = MemberFilter {
            id: Some(member_id),
            ..Default::default()
        };
        let member = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(member)
    }
}

#[async_trait]
impl Insert<Member> for Connection {
    async fn insert(&self, member: Member) -> Result<Member> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO members (
                    name,
                    email,
                    phone,
                    notes,
                    joined_at,
                    status
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&member.name)
                .push_bind(&member.email)
                .push_bind(&member.phone)
                .push_bind(&member.notes)
                .push_bind(member.joined_at)
                .push_bind(member.status);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<Member> for Connection {
    /// Update member
    async fn update(&self, member: Member) -> Result<Member> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE members SET")
                .push(" name = ")
                .push_bind(&member.name)
                .push(", email = ")
                .push_bind(&member.email)
                .push(", phone = ")
                .push_bind(&member.phone)
                .push(", notes = ")
                .push_bind(&member.notes)
                .push(", joined_at = ")
                .push_bind(member.joined_at)
                .push(", status = ")
                .push_bind(member.status)
                .push(" WHERE id = ")
                .push_bind(member.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(member.id).await
    }
}

#[async_trait]
impl Delete<Member> for Connection {
    /// Delete member
    async fn delete(&self, member: Member) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM members WHERE id = ")
            .push_bind(member.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    use civica_data::MemberStatus;

    #[tokio::test]
    async fn test_member_insert() {
        let db = Connection::open_test().await;
        let member = Member {
            name: "Test Member".to_string(),
            email: "mail@test-member.civica".to_string(),
            phone: "555 123 4567".to_string(),
            notes: "was very nice".to_string(),
            joined_at: NaiveDate::from_ymd_opt(2023, 4, 9).unwrap(),
            ..Member::default()
        };
        let member = db.insert(member).await.unwrap();

        assert_eq!(member.name, "Test Member");
        assert_eq!(member.email, "mail@test-member.civica");
        assert_eq!(member.phone, "555 123 4567");
        assert_eq!(member.notes, "was very nice");
        assert_eq!(member.joined_at, NaiveDate::from_ymd_opt(2023, 4, 9).unwrap());
        assert_eq!(member.status, MemberStatus::Active);
    }

    #[tokio::test]
    async fn test_member_update() {
        let db = Connection::open_test().await;
        let member = Member {
            name: "Test Member".to_string(),
            email: "old@civica.test".to_string(),
            ..Member::default()
        };
        let mut member = db.insert(member).await.unwrap();
        member.name = "Test Member Updated".to_string();
        member.email = "new@civica.test".to_string();
        member.status = MemberStatus::Inactive;
        member.notes = "was not very nice".to_string();

        let member = db.update(member).await.unwrap();
        assert_eq!(member.name, "Test Member Updated");
        assert_eq!(member.email, "new@civica.test");
        assert_eq!(member.status, MemberStatus::Inactive);
        assert_eq!(member.notes, "was not very nice");
    }

    #[tokio::test]
    async fn test_member_filter() {
        let db = Connection::open_test().await;
        db.insert(Member {
            name: "Test Member 1".to_string(),
            email: "test1@civica.test".to_string(),
            ..Member::default()
        })
        .await
        .unwrap();
        db.insert(Member {
            name: "Test Member 2".to_string(),
            email: "test2@civica.test".to_string(),
            status: MemberStatus::Inactive,
            ..Member::default()
        })
        .await
        .unwrap();

        let filter = MemberFilter {
            name: Some("Member 2".to_string()),
            ..MemberFilter::default()
        };
        let members: Vec<Member> = db.query(&filter).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Test Member 2");

        let filter = MemberFilter {
            status: Some(MemberStatus::Active),
            ..MemberFilter::default()
        };
        let members: Vec<Member> = db.query(&filter).await.unwrap();
        assert_eq!(members.len(), 1);
        assert_eq!(members[0].name, "Test Member 1");
    }

    #[tokio::test]
    async fn test_member_delete() {
        let db = Connection::open_test().await;
        let member = db
            .insert(Member {
                name: "Test Member".to_string(),
                ..Member::default()
            })
            .await
            .unwrap();

        db.delete(member).await.unwrap();

        let members: Vec<Member> = db.query(&MemberFilter::default()).await.unwrap();
        assert!(members.is_empty());
    }
}

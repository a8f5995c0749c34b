use anyhow::Result;
use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};

use civica_data::{Delete, Insert, NewsFilter, NewsPost, Query, Retrieve, Update};

use crate::{
    results::{Id, QueryError},
    Connection,
};

#[async_trait]
impl Query<NewsPost> for Connection {
    type Filter = NewsFilter;
    async fn query(&self, filter: &Self::Filter) -> Result<Vec<NewsPost>> {
        let mut conn = self.lock().await;
        let mut qry = QueryBuilder::new(
            r#"
            SELECT
                id,
                title,
                body,
                category,
                image_url,
                status,
                published_at,
                views
            FROM news
            WHERE 1
            "#,
        );

        if let Some(id) = filter.id {
            qry.push(" AND id = ").push_bind(id);
        }
        if let Some(status) = filter.status {
            qry.push(" AND status = ").push_bind(status);
        }
        if let Some(category) = filter.category.clone() {
            qry.push(" AND category = ").push_bind(category);
        }
        qry.push(" ORDER BY id DESC ");

        let posts: Vec<NewsPost> = qry.build_query_as().fetch_all(&mut *conn).await?;
        Ok(posts)
    }
}

#[async_trait]
impl Retrieve<NewsPost> for Connection {
    type Key = u32;
    async fn retrieve(&self, post_id: Self::Key) -> Result<NewsPost> {
        let filter = NewsFilter {
            id: Some(post_id),
            ..Default::default()
        };
        let post = self
            .query(&filter)
            .await?
            .pop()
            .ok_or(QueryError::NotFound)?;
        Ok(post)
    }
}

#[async_trait]
impl Insert<NewsPost> for Connection {
    async fn insert(&self, post: NewsPost) -> Result<NewsPost> {
        let insert: Id = {
            let mut conn = self.lock().await;
            let mut qry = QueryBuilder::<Sqlite>::new(
                r#"INSERT INTO news (
                    title,
                    body,
                    category,
                    image_url,
                    status,
                    published_at,
                    views
                ) VALUES (
                "#,
            );
            qry.separated(", ")
                .push_bind(&post.title)
                .push_bind(&post.body)
                .push_bind(&post.category)
                .push_bind(&post.image_url)
                .push_bind(post.status)
                .push_bind(post.published_at)
                .push_bind(post.views);

            qry.push(") RETURNING id ")
                .build_query_as()
                .fetch_one(&mut *conn)
                .await?
        };
        self.retrieve(insert.id).await
    }
}

#[async_trait]
impl Update<NewsPost> for Connection {
    /// Update news post
    async fn update(&self, post: NewsPost) -> Result<NewsPost> {
        {
            let mut conn = self.lock().await;
            QueryBuilder::<Sqlite>::new("UPDATE news SET")
                .push(" title = ")
                .push_bind(&post.title)
                .push(", body = ")
                .push_bind(&post.body)
                .push(", category = ")
                .push_bind(&post.category)
                .push(", image_url = ")
                .push_bind(&post.image_url)
                .push(", status = ")
                .push_bind(post.status)
                .push(", published_at = ")
                .push_bind(post.published_at)
                .push(", views = ")
                .push_bind(post.views)
                .push(" WHERE id = ")
                .push_bind(post.id)
                .build()
                .execute(&mut *conn)
                .await?;
        }
        self.retrieve(post.id).await
    }
}

#[async_trait]
impl Delete<NewsPost> for Connection {
    /// Delete news post
    async fn delete(&self, post: NewsPost) -> Result<()> {
        let mut conn = self.lock().await;
        QueryBuilder::<Sqlite>::new("DELETE FROM news WHERE id = ")
            .push_bind(post.id)
            .build()
            .execute(&mut *conn)
            .await?;
        Ok(())
    }
}

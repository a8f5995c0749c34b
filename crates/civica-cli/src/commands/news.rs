use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use inquire::Confirm;

use civica_data::{Delete, Insert, NewsFilter, NewsPost, NewsStatus, Query, Retrieve, Update};
use civica_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum News {
    /// List news posts
    #[clap(name = "list")]
    List(ListNews),
    /// Add a draft post
    #[clap(name = "add")]
    Add(AddNews),
    /// Publish a draft post
    #[clap(name = "publish")]
    Publish(PublishNews),
    /// Delete a post
    #[clap(name = "delete")]
    Delete(DeleteNews),
}

impl News {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            News::List(cmd) => cmd.run(db).await,
            News::Add(cmd) => cmd.run(db).await,
            News::Publish(cmd) => cmd.run(db).await,
            News::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListNews {
    #[clap(short, long)]
    pub status: Option<NewsStatus>,
    #[clap(short, long)]
    pub category: Option<String>,
}

impl ListNews {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = NewsFilter {
            status: self.status,
            category: self.category,
            ..Default::default()
        };

        let posts: Vec<NewsPost> = db.query(&filter).await?;
        let published = posts
            .iter()
            .filter(|p| p.status == NewsStatus::Published)
            .count();
        let views: u32 = posts.iter().map(|p| p.views).sum();
        println!(
            "{} posts ({} published, {} drafts, {} views).",
            posts.len(),
            published,
            posts.len() - published,
            views
        );
        posts.print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddNews {
    #[clap(short, long)]
    pub title: String,
    #[clap(short, long)]
    pub body: String,
    #[clap(short = 'k', long, default_value = "Otro")]
    pub category: String,
    #[clap(long)]
    pub image_url: Option<String>,
}

impl AddNews {
    /// Run the command and store a new draft
    pub async fn run(self, db: &Connection) -> Result<()> {
        let post = NewsPost {
            title: self.title,
            body: self.body,
            category: self.category,
            image_url: self.image_url.unwrap_or_default(),
            ..Default::default()
        };

        let post = db.insert(post).await?;
        println!("Draft added with id {}.", post.id);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct PublishNews {
    #[clap(short, long)]
    pub id: u32,
}

impl PublishNews {
    /// Publish a draft and stamp the publication time
    pub async fn run(self, db: &Connection) -> Result<()> {
        let post: NewsPost = db.retrieve(self.id).await?;
        if post.status == NewsStatus::Published {
            println!("\"{}\" is already published.", post.title);
            return Ok(());
        }

        let post = db
            .update(NewsPost {
                status: NewsStatus::Published,
                published_at: Some(Utc::now()),
                ..post
            })
            .await?;
        println!("\"{}\" published.", post.title);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteNews {
    #[clap(short, long)]
    pub id: u32,
}

impl DeleteNews {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let post: NewsPost = db.retrieve(self.id).await?;
        println!("\"{}\" ({})", post.title, post.status);
        let confirm = Confirm::new("Delete this post?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }
        db.delete(post).await?;
        Ok(())
    }
}

use clap::{Parser, Subcommand};

use crate::commands::{
    Attendance, Donations, Events, Members, News, ShowStats, Subscriptions,
};

#[derive(Parser, Debug)]
#[clap(name = "civica", version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[clap(long, env = "CIVICA_DB", default_value = "civica.sqlite3")]
    pub db: String,

    #[clap(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn init() -> Self {
        Self::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage members
    #[clap(subcommand)]
    Members(Members),
    /// Manage events and their lifecycle
    #[clap(subcommand)]
    Events(Events),
    /// Manage event attendance
    #[clap(subcommand)]
    Attendance(Attendance),
    /// Manage donations
    #[clap(subcommand)]
    Donations(Donations),
    /// Manage monthly donation subscriptions
    #[clap(subcommand)]
    Subscriptions(Subscriptions),
    /// Manage news posts
    #[clap(subcommand)]
    News(News),
    /// Show the dashboard numbers
    #[clap(name = "stats")]
    Stats(ShowStats),
}

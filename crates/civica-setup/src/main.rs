use anyhow::Result;

use clap::{Parser, Subcommand};

use civica_db::{schema, Connection};

#[derive(Parser, Debug)]
#[clap(name = "civica-setup")]
struct Cli {
    #[clap(long, env = "CIVICA_DB", default_value = "civica.sqlite3")]
    pub db: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Init,
}

/// Initialize the database
async fn db_init(filename: &str) -> Result<()> {
    let conn = Connection::open(filename).await?;
    schema::install(&conn).await?;
    println!("database schema installed");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init => db_init(&cli.db).await?,
    }
    Ok(())
}

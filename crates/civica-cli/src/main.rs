use anyhow::Result;

use civica_cli::cli::{Cli, Command};
use civica_db::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::init();

    let db = Connection::open(&cli.db).await?;
    match cli.command {
        Command::Members(cmd) => cmd.run(&db).await,
        Command::Events(cmd) => cmd.run(&db).await,
        Command::Attendance(cmd) => cmd.run(&db).await,
        Command::Donations(cmd) => cmd.run(&db).await,
        Command::Subscriptions(cmd) => cmd.run(&db).await,
        Command::News(cmd) => cmd.run(&db).await,
        Command::Stats(cmd) => cmd.run(&db).await,
    }?;

    Ok(())
}

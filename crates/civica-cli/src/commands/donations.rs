use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::{Args, Subcommand};
use inquire::Confirm;
use rust_decimal::Decimal;

use civica_core::{datetime, donations};
use civica_data::{
    Donation, DonationFilter, DonationKind, Insert, PaymentStatus, Query,
};
use civica_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Donations {
    /// List donations
    #[clap(name = "list")]
    List(ListDonations),
    /// Record a donation
    #[clap(name = "add")]
    Add(AddDonation),
    /// Show donation totals and month-over-month growth
    #[clap(name = "stats")]
    Stats(DonationStats),
}

impl Donations {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Donations::List(cmd) => cmd.run(db).await,
            Donations::Add(cmd) => cmd.run(db).await,
            Donations::Stats(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ListDonations {
    #[clap(short, long)]
    pub member_id: Option<u32>,
    #[clap(short, long)]
    pub status: Option<PaymentStatus>,
    #[clap(short, long)]
    pub kind: Option<DonationKind>,
}

impl ListDonations {
    /// Run the command and list donations
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = DonationFilter {
            member_id: self.member_id,
            payment_status: self.status,
            kind: self.kind,
            ..Default::default()
        };

        let donations: Vec<Donation> = db.query(&filter).await?;
        println!("{} donations.", donations.len());
        donations.print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddDonation {
    #[clap(short, long)]
    pub amount: Decimal,
    #[clap(short = 'n', long)]
    pub donor_name: String,
    #[clap(short = 'e', long)]
    pub donor_email: Option<String>,
    #[clap(short, long)]
    pub member_id: Option<u32>,
    #[clap(long, default_value = "MXN")]
    pub currency: String,
    #[clap(short, long, default_value = "completed")]
    pub status: PaymentStatus,
    #[clap(short = 'c', long)]
    pub description: Option<String>,
}

impl AddDonation {
    /// Run the command and record a one-time donation
    pub async fn run(self, db: &Connection) -> Result<()> {
        let donation = Donation {
            member_id: self.member_id,
            donor_name: self.donor_name,
            donor_email: self.donor_email.unwrap_or_default(),
            amount: self.amount,
            currency: self.currency,
            payment_status: self.status,
            occurred_at: Utc::now(),
            description: self.description.unwrap_or_default(),
            ..Default::default()
        };

        println!(
            "{} {} from {} ({})",
            donation.amount, donation.currency, donation.donor_name,
            donation.payment_status
        );
        let confirm = Confirm::new("Record donation?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        let donation = db.insert(donation).await?;
        println!("Donation recorded with id {}.", donation.id);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DonationStats {}

impl DonationStats {
    /// Run the command and show the aggregated figures
    pub async fn run(self, db: &Connection) -> Result<()> {
        let donations: Vec<Donation> = db.query(&DonationFilter::default()).await?;

        let now = Utc::now();
        let totals = donations::aggregate(&donations, now);

        let today = datetime::today();
        let previous = datetime::prev_month(today);
        let current = donations::month_total(&donations, today.year(), today.month());
        let before = donations::month_total(&donations, previous.year(), previous.month());
        let growth = donations::growth_percent(current, before);

        println!();
        totals.print_formatted();
        let sign = if growth >= 0 { "+" } else { "" };
        println!("Growth:\t\t{}{}%", sign, growth);
        println!();

        Ok(())
    }
}

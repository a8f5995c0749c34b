use anyhow::Result;
use chrono::{Datelike, Utc};
use clap::Args;

use civica_core::{datetime, donations};
use civica_data::{
    Donation, DonationFilter, Event, EventFilter, EventStatus, Member, MemberFilter,
    MemberStatus, Query,
};
use civica_db::Connection;

#[derive(Args, Debug)]
pub struct ShowStats {}

impl ShowStats {
    /// Assemble the dashboard numbers: upcoming events, active
    /// members, this month's donations and their growth against the
    /// month before.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let today = datetime::today();

        let upcoming: Vec<Event> = db
            .query(&EventFilter {
                status: Some(EventStatus::Upcoming),
                date_after: Some(today),
                ..Default::default()
            })
            .await?;

        let active: Vec<Member> = db
            .query(&MemberFilter {
                status: Some(MemberStatus::Active),
                ..Default::default()
            })
            .await?;

        let donations: Vec<Donation> = db.query(&DonationFilter::default()).await?;
        let previous = datetime::prev_month(today);
        let this_month = donations::month_total(&donations, today.year(), today.month());
        let last_month =
            donations::month_total(&donations, previous.year(), previous.month());
        let growth = donations::growth_percent(this_month, last_month);
        let sign = if growth >= 0 { "+" } else { "" };

        let totals = donations::aggregate(&donations, Utc::now());

        println!();
        println!("Upcoming events:\t{}", upcoming.len());
        println!("Active members:\t\t{}", active.len());
        println!("Donations this month:\t{}", this_month);
        println!("Growth:\t\t\t{}{}%", sign, growth);
        println!("Donated all time:\t{}", totals.total);
        println!();

        Ok(())
    }
}

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use inquire::Confirm;

use civica_core::attendance::{self, Transition};
use civica_core::registration;
use civica_data::{
    AttendanceFilter, AttendanceRecord, Event, Member, MemberFilter, Query, Retrieve,
    Update,
};
use civica_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Attendance {
    /// Show the reconciled roster of an event
    #[clap(name = "roster")]
    Roster(ShowRoster),
    /// Register a member for an event
    #[clap(name = "register")]
    Register(RegisterMember),
    /// Withdraw a member's registration
    #[clap(name = "withdraw")]
    Withdraw(WithdrawMember),
    /// Mark a confirmed registration as attended
    #[clap(name = "attended")]
    Attended(MarkAttended),
    /// Mark a confirmed registration as no-show
    #[clap(name = "no-show")]
    NoShow(MarkNoShow),
    /// Revert a marked registration back to confirmed
    #[clap(name = "revert")]
    Revert(RevertRecord),
    /// Mark a selection of confirmed registrations as attended
    #[clap(name = "confirm")]
    Confirm(ConfirmSelected),
}

impl Attendance {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Attendance::Roster(cmd) => cmd.run(db).await,
            Attendance::Register(cmd) => cmd.run(db).await,
            Attendance::Withdraw(cmd) => cmd.run(db).await,
            Attendance::Attended(cmd) => cmd.run(db).await,
            Attendance::NoShow(cmd) => cmd.run(db).await,
            Attendance::Revert(cmd) => cmd.run(db).await,
            Attendance::Confirm(cmd) => cmd.run(db).await,
        }
    }
}

/// Member names for roster output
async fn member_names(db: &Connection) -> Result<HashMap<u32, String>> {
    let members: Vec<Member> = db.query(&MemberFilter::default()).await?;
    Ok(members.into_iter().map(|m| (m.id, m.name)).collect())
}

fn print_section(
    heading: &str,
    records: &[AttendanceRecord],
    names: &HashMap<u32, String>,
) {
    if records.is_empty() {
        return;
    }
    println!("{} ({})", heading, records.len());
    for record in records {
        let name = names
            .get(&record.member_id)
            .map(String::as_str)
            .unwrap_or("unknown member");
        println!(
            "  {:>4}\t{:<24}\t{}",
            record.id,
            name,
            record.registered_at.format("%Y-%m-%d %H:%M")
        );
    }
}

#[derive(Args, Debug)]
pub struct ShowRoster {
    #[clap(short, long)]
    pub event_id: u32,
}

impl ShowRoster {
    /// Run the command and show the partitioned roster
    pub async fn run(self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.event_id).await?;
        let records = event.get_attendance(db).await?;
        let roster = attendance::reconcile(&records);
        let names = member_names(db).await?;

        println!();
        println!("{} ({})", event.title, event.scheduled_date);
        roster.counts.print_formatted();
        println!();
        print_section("Confirmed", &roster.confirmed, &names);
        print_section("Attended", &roster.attended, &names);
        print_section("No show", &roster.no_show, &names);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RegisterMember {
    #[clap(short, long)]
    pub event_id: u32,
    #[clap(short, long)]
    pub member_id: u32,
}

impl RegisterMember {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.event_id).await?;
        let member: Member = db.retrieve(self.member_id).await?;

        let (event, _) = registration::register(db, event, &member, Utc::now()).await?;
        println!(
            "{} registered for \"{}\" ({} seats left).",
            member.name,
            event.title,
            event.seats_left()
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct WithdrawMember {
    #[clap(short, long)]
    pub event_id: u32,
    #[clap(short, long)]
    pub member_id: u32,
}

impl WithdrawMember {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.event_id).await?;
        let records: Vec<AttendanceRecord> = db
            .query(&AttendanceFilter {
                event_id: Some(self.event_id),
                member_id: Some(self.member_id),
                ..Default::default()
            })
            .await?;
        let record = records
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("no registration found"))?;

        let event = registration::withdraw(db, event, record).await?;
        println!(
            "Registration withdrawn from \"{}\" ({} seats left).",
            event.title,
            event.seats_left()
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MarkAttended {
    #[clap(short, long)]
    pub id: u32,
}

impl MarkAttended {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let record: AttendanceRecord = db.retrieve(self.id).await?;
        let record = record.mark_attended()?;
        db.update(record).await?;
        println!("Attendance {} marked as attended.", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct MarkNoShow {
    #[clap(short, long)]
    pub id: u32,
}

impl MarkNoShow {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let record: AttendanceRecord = db.retrieve(self.id).await?;
        let record = record.mark_no_show()?;
        db.update(record).await?;
        println!("Attendance {} marked as no-show.", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RevertRecord {
    #[clap(short, long)]
    pub id: u32,
}

impl RevertRecord {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let record: AttendanceRecord = db.retrieve(self.id).await?;
        let record = record.revert()?;
        db.update(record).await?;
        println!("Attendance {} reverted to confirmed.", self.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ConfirmSelected {
    #[clap(short, long)]
    pub event_id: u32,
    /// Attendance record ids, comma separated
    #[clap(short, long, value_delimiter = ',')]
    pub ids: Vec<u32>,
}

impl ConfirmSelected {
    /// Run the bulk confirmed -> attended transition over the
    /// selected records of one event.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.event_id).await?;
        let records = event.get_attendance(db).await?;

        let ids: HashSet<u32> = self.ids.into_iter().collect();
        let updated = attendance::confirm_selected(&ids, &records)?;
        if updated.is_empty() {
            println!("Nothing to confirm.");
            return Ok(());
        }

        let prompt_msg = format!("Mark {} registration(s) as attended?", updated.len());
        let confirm = Confirm::new(&prompt_msg).with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        let count = updated.len();
        for record in updated {
            db.update(record).await?;
        }
        println!("{} registration(s) marked as attended.", count);

        Ok(())
    }
}

use std::collections::HashSet;

use anyhow::Result;
use chrono::{Datelike, NaiveDate, NaiveTime};
use clap::{Args, Subcommand};
use inquire::Confirm;

use civica_core::lifecycle::{self, SyncLifecycle};
use civica_core::{calendar, datetime};
use civica_data::{
    AttendanceFilter, AttendanceRecord, Delete, Event, EventFilter, EventStatus, Insert,
    Query, Retrieve, Update,
};
use civica_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Events {
    /// Show an event
    #[clap(name = "show")]
    Show(ShowEvent),
    /// List events
    #[clap(name = "list")]
    List(ListEvents),
    /// Add an event
    #[clap(name = "add")]
    Add(AddEvent),
    /// Update an event
    #[clap(name = "set")]
    Update(UpdateEvent),
    /// Delete an event
    #[clap(name = "delete")]
    Delete(DeleteEvent),
    /// Reconcile stored event statuses with the calendar
    #[clap(name = "sync")]
    Sync(SyncEvents),
    /// Month overview as a member sees it
    #[clap(name = "calendar")]
    Calendar(ShowCalendar),
}

impl Events {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Events::Show(cmd) => cmd.run(db).await,
            Events::List(cmd) => cmd.run(db).await,
            Events::Add(cmd) => cmd.run(db).await,
            Events::Update(cmd) => cmd.run(db).await,
            Events::Delete(cmd) => cmd.run(db).await,
            Events::Sync(cmd) => cmd.run(db).await,
            Events::Calendar(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowEvent {
    #[clap(short, long)]
    pub id: u32,
}

impl ShowEvent {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.id).await?;
        println!();
        event.print_formatted();
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListEvents {
    #[clap(short, long)]
    pub status: Option<EventStatus>,
    #[clap(short, long)]
    pub category: Option<String>,
    #[clap(long)]
    pub date_after: Option<NaiveDate>,
    #[clap(long)]
    pub date_before: Option<NaiveDate>,
}

impl ListEvents {
    /// Run the command and list events
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = EventFilter {
            status: self.status,
            category: self.category,
            date_after: self.date_after,
            date_before: self.date_before,
            ..Default::default()
        };

        let events: Vec<Event> = db.query(&filter).await?;
        let upcoming = events
            .iter()
            .filter(|e| e.status == EventStatus::Upcoming)
            .count();
        let active = events
            .iter()
            .filter(|e| e.status == EventStatus::Active)
            .count();
        let completed = events
            .iter()
            .filter(|e| e.status == EventStatus::Completed)
            .count();
        println!(
            "{} events ({} upcoming, {} active, {} completed).",
            events.len(),
            upcoming,
            active,
            completed
        );
        events.print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddEvent {
    #[clap(short, long)]
    pub title: String,
    #[clap(short, long)]
    pub date: NaiveDate,
    #[clap(long, default_value = "18:00:00")]
    pub time: NaiveTime,
    #[clap(short = 'k', long, default_value = "Otro")]
    pub category: String,
    #[clap(short, long)]
    pub location: Option<String>,
    #[clap(short = 'm', long, default_value_t = 50)]
    pub capacity: u32,
    #[clap(short = 'c', long)]
    pub description: Option<String>,
}

impl AddEvent {
    /// Run the command and add an event. The initial status comes
    /// from the scheduled date, never from the caller.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let today = datetime::today();
        let event = Event {
            title: self.title,
            description: self.description.unwrap_or_default(),
            category: self.category,
            location: self.location.unwrap_or_default(),
            scheduled_date: self.date,
            scheduled_time: self.time,
            capacity: self.capacity,
            status: lifecycle::resolve(today, self.date),
            ..Default::default()
        };

        println!();
        event.print_formatted();
        println!();

        let confirm = Confirm::new("Add event?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        let event = db.insert(event).await?;
        println!("Event added with id {}.", event.id);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateEvent {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub title: Option<String>,
    #[clap(short, long)]
    pub date: Option<NaiveDate>,
    #[clap(long)]
    pub time: Option<NaiveTime>,
    #[clap(short = 'k', long)]
    pub category: Option<String>,
    #[clap(short, long)]
    pub location: Option<String>,
    #[clap(short = 'm', long)]
    pub capacity: Option<u32>,
    #[clap(short = 'c', long)]
    pub description: Option<String>,
}

impl UpdateEvent {
    /// Run command and update an event
    pub async fn run(self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.id).await?;
        let mut update = event.clone();

        if let Some(title) = self.title {
            update.title = title;
        }
        if let Some(date) = self.date {
            update.scheduled_date = date;
        }
        if let Some(time) = self.time {
            update.scheduled_time = time;
        }
        if let Some(category) = self.category {
            update.category = category;
        }
        if let Some(location) = self.location {
            update.location = location;
        }
        if let Some(capacity) = self.capacity {
            update.capacity = capacity;
        }
        if let Some(description) = self.description {
            update.description = description;
        }
        // A moved date can change the lifecycle state
        update.status = lifecycle::resolve(datetime::today(), update.scheduled_date);

        println!();
        update.print_formatted();
        println!();
        let confirm = Confirm::new("Update event?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        db.update(update).await?;

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteEvent {
    #[clap(short, long)]
    pub id: u32,
}

impl DeleteEvent {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let event: Event = db.retrieve(self.id).await?;
        println!();
        event.print_formatted();
        println!();
        let confirm =
            Confirm::new("Delete event and its attendance records?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }
        db.delete(event).await?;
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ShowCalendar {
    /// Month to display, defaults to the current one
    #[clap(long)]
    pub year: Option<i32>,
    #[clap(long)]
    pub month: Option<u32>,
    /// Count this member's own registrations
    #[clap(short, long)]
    pub member_id: Option<u32>,
}

impl ShowCalendar {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let today = datetime::today();
        let year = self.year.unwrap_or(today.year());
        let month = self.month.unwrap_or(today.month());

        let events: Vec<Event> = db.query(&EventFilter::default()).await?;
        let registered: HashSet<u32> = match self.member_id {
            Some(member_id) => {
                let records: Vec<AttendanceRecord> = db
                    .query(&AttendanceFilter {
                        member_id: Some(member_id),
                        ..Default::default()
                    })
                    .await?;
                records.iter().map(|r| r.event_id).collect()
            }
            None => HashSet::new(),
        };

        let summary = calendar::month_summary(&events, &registered, year, month, today);
        println!();
        println!("Events in {:04}-{:02}:\t{}", year, month, summary.events_in_month);
        println!("My registrations:\t{}", summary.registered_in_month);
        println!("Next three days:\t{}", summary.next_three_days);
        println!();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SyncEvents {
    #[clap(short, long, default_value_t = datetime::today())]
    pub today: NaiveDate,
}

impl SyncEvents {
    /// Run the lifecycle reconciliation over all stored events.
    /// Safe to repeat: a second pass changes nothing.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let events: Vec<Event> = db.query(&EventFilter::default()).await?;
        let changes = events.sync_lifecycle(db, self.today).await?;

        for change in &changes {
            println!(
                "Event {}: {} -> {}",
                change.event_id, change.from, change.to
            );
        }
        println!("{} events updated.", changes.len());

        Ok(())
    }
}

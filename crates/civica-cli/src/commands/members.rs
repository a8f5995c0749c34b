use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use inquire::Confirm;

use civica_core::{datetime, donations};
use civica_data::{
    AttendanceState, Delete, Insert, Member, MemberFilter, MemberStatus, Query,
    Retrieve, Update,
};
use civica_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Members {
    /// Show a member with accrued totals
    #[clap(name = "show")]
    Show(ShowMember),
    /// List members
    #[clap(name = "list")]
    List(ListMembers),
    /// Add a member
    #[clap(name = "add")]
    Add(AddMember),
    /// Update a member
    #[clap(name = "set")]
    Update(UpdateMember),
    /// Delete a member
    #[clap(name = "delete")]
    Delete(DeleteMember),
}

impl Members {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Members::Show(cmd) => cmd.run(db).await,
            Members::List(cmd) => cmd.run(db).await,
            Members::Add(cmd) => cmd.run(db).await,
            Members::Update(cmd) => cmd.run(db).await,
            Members::Delete(cmd) => cmd.run(db).await,
        }
    }
}

#[derive(Args, Debug)]
pub struct ShowMember {
    #[clap(short, long)]
    pub id: u32,
}

impl ShowMember {
    /// Run the command and show a member
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        println!();
        member.print_formatted();

        let attended = member
            .get_attendance(db)
            .await?
            .iter()
            .filter(|r| r.state == AttendanceState::Attended)
            .count();
        let totals = donations::aggregate(&member.get_donations(db).await?, Utc::now());
        println!("Events attended:\t{}", attended);
        println!("Donated in total:\t{}", totals.total);
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListMembers {
    #[clap(short, long)]
    pub id: Option<u32>,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub email: Option<String>,
    #[clap(short, long)]
    pub status: Option<MemberStatus>,
}

impl ListMembers {
    /// Run the command and list members
    pub async fn run(self, db: &Connection) -> Result<()> {
        let filter = MemberFilter {
            id: self.id,
            name: self.name,
            email: self.email,
            status: self.status,
        };

        let members: Vec<Member> = db.query(&filter).await?;
        println!("{} members.", members.len());
        members.print_formatted();

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AddMember {
    #[clap(short, long)]
    pub name: String,
    #[clap(short, long)]
    pub email: String,
    #[clap(short, long)]
    pub phone: Option<String>,
    #[clap(short = 'c', long)]
    pub notes: Option<String>,
    #[clap(long)]
    pub joined_at: Option<NaiveDate>,
}

impl AddMember {
    /// Run the command and add a member to the database
    pub async fn run(self, db: &Connection) -> Result<()> {
        let joined_at = self.joined_at.unwrap_or(datetime::today());

        // Check if a member with this email already exists
        let members: Vec<Member> = db
            .query(&MemberFilter {
                email: Some(self.email.clone()),
                ..Default::default()
            })
            .await?;
        if !members.is_empty() {
            return Err(anyhow!(
                "Member with email {} already exists.",
                self.email
            ));
        }

        let member = Member {
            name: self.name,
            email: self.email,
            phone: self.phone.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
            joined_at,
            ..Default::default()
        };

        println!();
        member.print_formatted();
        println!();

        let confirm = Confirm::new("Add member?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        let member = db.insert(member).await?;
        println!("Member added with id {}.", member.id);

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UpdateMember {
    #[clap(short, long)]
    pub id: u32,
    #[clap(short, long)]
    pub name: Option<String>,
    #[clap(short, long)]
    pub email: Option<String>,
    #[clap(short, long)]
    pub phone: Option<String>,
    #[clap(short = 'c', long)]
    pub notes: Option<String>,
    #[clap(long)]
    pub joined_at: Option<NaiveDate>,
    #[clap(short, long)]
    pub status: Option<MemberStatus>,
}

impl UpdateMember {
    /// Run command and update a member
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        let mut update = member.clone();

        if let Some(name) = self.name {
            update.name = name;
        }
        if let Some(email) = self.email {
            update.email = email;
        }
        if let Some(phone) = self.phone {
            update.phone = phone;
        }
        if let Some(notes) = self.notes {
            update.notes = notes;
        }
        if let Some(joined_at) = self.joined_at {
            update.joined_at = joined_at;
        }
        if let Some(status) = self.status {
            update.status = status;
        }

        println!();
        (member.clone(), update.clone()).print_formatted();
        println!();
        let confirm = Confirm::new("Update member?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        if update.email != member.email {
            let members: Vec<Member> = db
                .query(&MemberFilter {
                    email: Some(update.email.clone()),
                    ..Default::default()
                })
                .await?;
            if !members.is_empty() {
                return Err(anyhow!(
                    "Member with email {} already exists.",
                    update.email
                ));
            }
        }

        db.update(update).await?;

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct DeleteMember {
    #[clap(short, long)]
    pub id: u32,
}

impl DeleteMember {
    pub async fn run(&self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.id).await?;
        println!();
        member.print_formatted();
        println!();
        let confirm = Confirm::new("Delete member from database?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }
        db.delete(member).await?;
        Ok(())
    }
}

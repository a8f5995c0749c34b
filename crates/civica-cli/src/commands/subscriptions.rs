use anyhow::Result;
use chrono::Utc;
use clap::{Args, Subcommand};
use inquire::Confirm;
use rust_decimal::Decimal;

use civica_core::billing::{self, BillingDay};
use civica_core::datetime;
use civica_data::{
    Insert, Member, Query, Retrieve, Subscription, SubscriptionFilter,
    SubscriptionState, Update,
};
use civica_db::Connection;

use crate::formatting::PrintFormatted;

#[derive(Subcommand, Debug)]
pub enum Subscriptions {
    /// Show a member's subscriptions
    #[clap(name = "show")]
    Show(ShowSubscriptions),
    /// Create or update a member's monthly subscription
    #[clap(name = "set")]
    Set(SetSubscription),
    /// Cancel a member's active subscription
    #[clap(name = "cancel")]
    Cancel(CancelSubscription),
    /// Advance charge dates that have already passed
    #[clap(name = "advance")]
    Advance(AdvanceSubscriptions),
}

impl Subscriptions {
    pub async fn run(self, db: &Connection) -> Result<()> {
        match self {
            Subscriptions::Show(cmd) => cmd.run(db).await,
            Subscriptions::Set(cmd) => cmd.run(db).await,
            Subscriptions::Cancel(cmd) => cmd.run(db).await,
            Subscriptions::Advance(cmd) => cmd.run(db).await,
        }
    }
}

/// The member's active subscription, if any.
async fn active_subscription(
    db: &Connection,
    member_id: u32,
) -> Result<Option<Subscription>> {
    let mut subscriptions: Vec<Subscription> = db
        .query(&SubscriptionFilter {
            member_id: Some(member_id),
            state: Some(SubscriptionState::Active),
            ..Default::default()
        })
        .await?;
    Ok(subscriptions.pop())
}

#[derive(Args, Debug)]
pub struct ShowSubscriptions {
    #[clap(short, long)]
    pub member_id: u32,
}

impl ShowSubscriptions {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.member_id).await?;
        let subscriptions = member.get_subscriptions(db).await?;
        if subscriptions.is_empty() {
            println!("{} has no subscriptions.", member.name);
            return Ok(());
        }
        for subscription in subscriptions {
            println!();
            subscription.print_formatted();
        }
        println!();
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct SetSubscription {
    #[clap(short, long)]
    pub member_id: u32,
    #[clap(short, long)]
    pub amount: Decimal,
    /// Day of month the charge falls on (1..=28)
    #[clap(short, long)]
    pub billing_day: u8,
    #[clap(long)]
    pub card_last_digits: Option<String>,
}

impl SetSubscription {
    /// Create the member's subscription, or move the existing active
    /// one to the new amount and anchor day.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.member_id).await?;

        let day = BillingDay::new(self.billing_day)?;
        let next_charge_date = billing::next_billing_date(day, datetime::today());

        let existing = active_subscription(db, member.id).await?;

        let subscription = match existing {
            Some(subscription) => Subscription {
                amount: self.amount,
                billing_day: day.get(),
                next_charge_date,
                card_last_digits: self
                    .card_last_digits
                    .unwrap_or(subscription.card_last_digits.clone()),
                ..subscription
            },
            None => Subscription {
                member_id: member.id,
                amount: self.amount,
                billing_day: day.get(),
                next_charge_date,
                card_last_digits: self.card_last_digits.unwrap_or_default(),
                ..Default::default()
            },
        };

        println!();
        subscription.print_formatted();
        println!();
        let confirm = Confirm::new("Save subscription?").with_default(true);
        if !confirm.prompt()? {
            return Ok(());
        }

        let subscription = if subscription.id > 0 {
            db.update(subscription).await?
        } else {
            db.insert(subscription).await?
        };
        println!(
            "Subscription for {} charges {} on day {} (next: {}).",
            member.name,
            subscription.amount,
            subscription.billing_day,
            subscription.next_charge_date
        );

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct CancelSubscription {
    #[clap(short, long)]
    pub member_id: u32,
}

impl CancelSubscription {
    pub async fn run(self, db: &Connection) -> Result<()> {
        let member: Member = db.retrieve(self.member_id).await?;
        let Some(subscription) = active_subscription(db, member.id).await? else {
            println!("{} has no active subscription.", member.name);
            return Ok(());
        };

        println!();
        subscription.print_formatted();
        println!();
        let confirm = Confirm::new("Cancel this subscription?").with_default(false);
        if !confirm.prompt()? {
            return Ok(());
        }

        db.update(Subscription {
            state: SubscriptionState::Cancelled,
            cancelled_at: Some(Utc::now()),
            ..subscription
        })
        .await?;
        println!("Subscription cancelled.");

        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct AdvanceSubscriptions {}

impl AdvanceSubscriptions {
    /// Move passed charge dates of active subscriptions to the next
    /// anchor. Subscriptions already pointing at the future are left
    /// alone, so repeating the pass changes nothing.
    pub async fn run(self, db: &Connection) -> Result<()> {
        let today = datetime::today();
        let subscriptions: Vec<Subscription> = db
            .query(&SubscriptionFilter {
                state: Some(SubscriptionState::Active),
                ..Default::default()
            })
            .await?;

        let mut advanced = 0;
        for subscription in subscriptions {
            let next = billing::roll_forward(subscription.next_charge_date, today);
            if next != subscription.next_charge_date {
                println!(
                    "Subscription {}: {} -> {}",
                    subscription.id, subscription.next_charge_date, next
                );
                db.update(Subscription {
                    next_charge_date: next,
                    ..subscription
                })
                .await?;
                advanced += 1;
            }
        }
        println!("{} subscriptions advanced.", advanced);

        Ok(())
    }
}

use civica_core::attendance::RosterCounts;
use civica_core::donations::Totals;
use civica_data::{Donation, Event, Member, NewsPost, Subscription};

macro_rules! next_attr {
    ($old:ident, $new:ident, $attr:ident) => {
        if $old.$attr != $new.$attr {
            format!(" -> {}", $new.$attr)
        } else {
            "".to_string()
        }
    };
}

pub trait PrintFormatted {
    fn print_formatted(&self);
}

impl PrintFormatted for Member {
    fn print_formatted(&self) {
        println!("Name:\t\t{}", self.name);
        println!("Email:\t\t{}", self.email);
        println!("Phone:\t\t{}", self.phone);
        println!("Notes:\t\t{}", self.notes);
        println!("Joined:\t\t{}", self.joined_at);
        println!("Status:\t\t{}", self.status);
    }
}

impl PrintFormatted for (Member, Member) {
    fn print_formatted(&self) {
        let (old, new) = self;
        let next_name = next_attr!(old, new, name);
        println!("Name:\t\t{}{}", old.name, next_name);
        let next_email = next_attr!(old, new, email);
        println!("Email:\t\t{}{}", old.email, next_email);
        let next_phone = next_attr!(old, new, phone);
        println!("Phone:\t\t{}{}", old.phone, next_phone);
        let next_notes = next_attr!(old, new, notes);
        println!("Notes:\t\t{}{}", old.notes, next_notes);
        let next_joined = next_attr!(old, new, joined_at);
        println!("Joined:\t\t{}{}", old.joined_at, next_joined);
        let next_status = next_attr!(old, new, status);
        println!("Status:\t\t{}{}", old.status, next_status);
    }
}

impl PrintFormatted for Vec<Member> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:<30}\t{:<12}\t{:<10}\t{}",
            "ID", "Name", "Email", "Joined", "Status", "Notes"
        );
        println!("{:-<110}", "-");
        for member in self {
            println!(
                "{:>4}\t{:<24}\t{:<30}\t{}\t{:<10}\t{}",
                member.id, member.name, member.email, member.joined_at, member.status,
                member.notes
            );
        }
    }
}

impl PrintFormatted for Event {
    fn print_formatted(&self) {
        println!("Title:\t\t{}", self.title);
        println!("Category:\t{}", self.category);
        println!("Location:\t{}", self.location);
        println!("Date:\t\t{} {}", self.scheduled_date, self.scheduled_time);
        println!("Seats:\t\t{} / {}", self.confirmed_count, self.capacity);
        println!("Status:\t\t{}", self.status);
        println!("Description:\t{}", self.description);
    }
}

impl PrintFormatted for Vec<Event> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<32}\t{:<10}\t{:<8}\t{:>7}\t{:<10}\t{}",
            "ID", "Title", "Date", "Time", "Seats", "Status", "Category"
        );
        println!("{:-<110}", "-");
        for event in self {
            println!(
                "{:>4}\t{:<32}\t{}\t{}\t{:>3}/{:<3}\t{:<10}\t{}",
                event.id,
                event.title,
                event.scheduled_date,
                event.scheduled_time,
                event.confirmed_count,
                event.capacity,
                event.status,
                event.category
            );
        }
    }
}

impl PrintFormatted for RosterCounts {
    fn print_formatted(&self) {
        println!("Total:\t\t{}", self.total);
        println!("Confirmed:\t{}", self.confirmed);
        println!("Attended:\t{}", self.attended);
        println!("No show:\t{}", self.no_show);
    }
}

impl PrintFormatted for Vec<Donation> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<24}\t{:>12}\t{:<4}\t{:<9}\t{:<10}\t{}",
            "ID", "Donor", "Amount", "Cur", "Kind", "Status", "Date"
        );
        println!("{:-<110}", "-");
        for donation in self {
            println!(
                "{:>4}\t{:<24}\t{:>12}\t{:<4}\t{:<9}\t{:<10}\t{}",
                donation.id,
                donation.donor_name,
                donation.amount,
                donation.currency,
                donation.kind,
                donation.payment_status,
                donation.occurred_at.format("%Y-%m-%d %H:%M")
            );
        }
    }
}

impl PrintFormatted for Totals {
    fn print_formatted(&self) {
        println!("Total donated:\t{}", self.total);
        println!("This year:\t{}", self.current_year);
        println!("This month:\t{}", self.current_month);
        println!("Donations:\t{}", self.count);
        println!("Average:\t{:.2}", self.average);
    }
}

impl PrintFormatted for Subscription {
    fn print_formatted(&self) {
        println!("Member:\t\t{}", self.member_id);
        println!("Amount:\t\t{}", self.amount);
        println!("Billing day:\t{}", self.billing_day);
        println!("Next charge:\t{}", self.next_charge_date);
        println!("State:\t\t{}", self.state);
        if let Some(cancelled_at) = self.cancelled_at {
            println!("Cancelled:\t{}", cancelled_at.format("%Y-%m-%d %H:%M"));
        }
        if !self.card_last_digits.is_empty() {
            println!("Card:\t\t**** {}", self.card_last_digits);
        }
    }
}

impl PrintFormatted for Vec<NewsPost> {
    fn print_formatted(&self) {
        println!(
            "{:>4}\t{:<40}\t{:<16}\t{:<10}\t{:>6}\t{}",
            "ID", "Title", "Category", "Status", "Views", "Published"
        );
        println!("{:-<110}", "-");
        for post in self {
            let published = match post.published_at {
                Some(at) => at.format("%Y-%m-%d").to_string(),
                None => "-".to_string(),
            };
            println!(
                "{:>4}\t{:<40}\t{:<16}\t{:<10}\t{:>6}\t{}",
                post.id, post.title, post.category, post.status, post.views, published
            );
        }
    }
}

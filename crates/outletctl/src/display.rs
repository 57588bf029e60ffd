//! Terminal output for outlet listings, overlap reports and chat.

use outlet_common::{overlap_pairs, Conversation, Outlet, Role, SERVICE_RADIUS_KM};
use owo_colors::OwoColorize;

pub fn print_outlets(outlets: &[Outlet]) {
    for (i, outlet) in outlets.iter().enumerate() {
        println!("{:>3}. {}", i + 1, outlet.name.bold());
        println!("     {}", outlet.address);
        if let Some(hours) = &outlet.operating_hours {
            println!("     {}", hours.dimmed());
        }
        match outlet.position() {
            Some(p) => println!("     {:.5}, {:.5}", p.latitude, p.longitude),
            None => println!("     {}", "no coordinates".yellow()),
        }
        if let Some(link) = &outlet.waze_link {
            println!("     {}", link.cyan());
        }
    }
}

/// Overlapping pairs, one line each, closest first
pub fn overlap_report(outlets: &[Outlet]) -> Vec<String> {
    let mut pairs = overlap_pairs(outlets, SERVICE_RADIUS_KM);
    pairs.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    pairs
        .iter()
        .map(|p| {
            format!(
                "{} <-> {} ({:.2} km)",
                outlets[p.first].name, outlets[p.second].name, p.distance_km
            )
        })
        .collect()
}

pub fn print_overlaps(outlets: &[Outlet]) {
    let lines = overlap_report(outlets);
    if lines.is_empty() {
        println!("No overlapping {} km service areas.", SERVICE_RADIUS_KM);
        return;
    }

    println!(
        "{} overlapping pairs within {} km:",
        lines.len().to_string().yellow().bold(),
        SERVICE_RADIUS_KM
    );
    for line in lines {
        println!("  • {}", line);
    }
}

pub fn print_reply(reply: &str) {
    println!("{} {}", "assistant>".green().bold(), reply);
    println!();
}

pub fn print_history(conversation: &Conversation) {
    if conversation.is_empty() {
        println!("{}", "No messages yet.".dimmed());
        return;
    }
    for entry in conversation.entries() {
        match entry.role {
            Role::User => println!("{} {}", "you>".blue().bold(), entry.content),
            Role::Assistant => println!("{} {}", "assistant>".green().bold(), entry.content),
        }
    }
    println!();
}

pub fn print_welcome() {
    println!();
    println!("{}", "Welcome to Subway Chat!".bold());
    println!("Ask me anything about Subway outlets in Kuala Lumpur.");
    println!(
        "{}",
        "Commands: /overlaps  /map  /refresh  /history  exit".dimmed()
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_report_sorted_by_distance() {
        let outlets = vec![
            Outlet::at("Subway A", "a", 3.1390, 101.6869),
            Outlet::at("Subway B", "b", 3.1750, 101.6869),
            Outlet::at("Subway C", "c", 3.1480, 101.6869),
        ];
        let lines = overlap_report(&outlets);
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Subway A <-> Subway C"));
        assert!(lines[0].ends_with("km)"));
    }
}

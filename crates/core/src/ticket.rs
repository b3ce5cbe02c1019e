//! Simulated ticket id synthesis.
//!
//! Ticket ids are a fixed prefix plus a random four-digit number. They are
//! not guaranteed unique and are not connected to any external tracker.

use rand::Rng;

/// Prefix of every synthesized ticket id.
pub const TICKET_PREFIX: &str = "IRS";

/// Generate a ticket id of the form `IRS-dddd` (1000..=9999).
pub fn generate_ticket_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let number: u16 = rng.random_range(1000..=9999);
    format!("{TICKET_PREFIX}-{number}")
}

/// Whether `s` matches the literal pattern `IRS-` followed by four digits.
pub fn is_ticket_id(s: &str) -> bool {
    s.strip_prefix(TICKET_PREFIX)
        .and_then(|rest| rest.strip_prefix('-'))
        .is_some_and(|digits| digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
}

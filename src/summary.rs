//! # Booking Summary Module
//!
//! Turns a finished [`Booking`] into the two confirmation messages: a plain
//! text copy for the patient and a MarkdownV2 copy for the clinic admin.

use crate::dialogue::Booking;

/// Shown instead of an absent or empty value
pub const PLACEHOLDER: &str = "N/A";

/// Characters Telegram's MarkdownV2 renderer treats as markup
const MARKDOWN_V2_SPECIAL: &[char] = &[
    '\\', '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.',
    '!',
];

/// Sender identity attached to the admin copy
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Sender {
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl Sender {
    pub fn display_name(&self) -> String {
        match self.last_name.as_deref().map(str::trim) {
            Some(last) if !last.is_empty() => format!("{} {}", self.first_name.trim(), last),
            _ => self.first_name.trim().to_string(),
        }
    }
}

impl From<&teloxide::types::User> for Sender {
    fn from(user: &teloxide::types::User) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// Escape text for MarkdownV2, substituting [`PLACEHOLDER`] for absent or
/// empty input.
pub fn escape_markdown_v2(text: Option<&str>) -> String {
    let text = match text {
        Some(text) if !text.is_empty() => text,
        _ => PLACEHOLDER,
    };

    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if MARKDOWN_V2_SPECIAL.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Plain-text summary sent back to the patient
pub fn format_user_summary(booking: &Booking) -> String {
    format!(
        "📩 እናመሰግናለን / Thank you! Here is your booking summary:\n\
         👤 Full Name: {}\n\
         📞 Contact: {}\n\
         🩺 Service: {}\n\
         📅 Preferred Date/Time: {}\n\
         💬 Message: {}\n\
         \n\
         We will contact you soon.",
        booking.full_name,
        booking.contact,
        booking.service.label(),
        booking.datetime,
        booking.message
    )
}

/// MarkdownV2 summary for the admin chat; every user-supplied value is escaped
pub fn format_admin_summary(booking: &Booking, sender: &Sender) -> String {
    format!(
        "📩 *New Booking Received*\n\
         👤 *Full Name:* {}\n\
         📞 *Contact:* {}\n\
         🩺 *Service:* {}\n\
         📅 *Preferred Date/Time:* {}\n\
         💬 *Message:* {}\n\
         \n\
         • From Telegram: {} \\(@{}\\)",
        escape_markdown_v2(Some(&booking.full_name)),
        escape_markdown_v2(Some(&booking.contact)),
        escape_markdown_v2(Some(booking.service.label())),
        escape_markdown_v2(Some(&booking.datetime)),
        escape_markdown_v2(Some(&booking.message)),
        escape_markdown_v2(Some(&sender.display_name())),
        escape_markdown_v2(sender.username.as_deref())
    )
}

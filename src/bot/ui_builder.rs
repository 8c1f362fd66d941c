//! UI Builder module for creating inline keyboards

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::dialogue::Service;
use crate::texts::{CANCEL_BUTTON, START_AGAIN_BUTTON, START_BUTTON};

pub const BEGIN_BOOKING_DATA: &str = "start_booking";
pub const CANCEL_BOOKING_DATA: &str = "cancel_booking";

fn cancel_button() -> InlineKeyboardButton {
    InlineKeyboardButton::callback(CANCEL_BUTTON, CANCEL_BOOKING_DATA)
}

/// Start / Cancel choice shown under the welcome message
pub fn create_welcome_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(START_BUTTON, BEGIN_BOOKING_DATA)],
        vec![cancel_button()],
    ])
}

/// One button per service, then Cancel
pub fn create_service_keyboard() -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = Service::ALL
        .into_iter()
        .map(|service| {
            vec![InlineKeyboardButton::callback(
                service.button_label(),
                service.callback_data(),
            )]
        })
        .collect();
    buttons.push(vec![cancel_button()]);

    InlineKeyboardMarkup::new(buttons)
}

/// Attached to the patient's summary so a new booking is one tap away
pub fn create_start_again_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        START_AGAIN_BUTTON,
        BEGIN_BOOKING_DATA,
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::InlineKeyboardButtonKind;

    fn callback_data(keyboard: &InlineKeyboardMarkup) -> Vec<String> {
        keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|button| match &button.kind {
                InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_service_keyboard_lists_every_service_then_cancel() {
        let data = callback_data(&create_service_keyboard());
        assert_eq!(
            data,
            vec![
                "service_checkup",
                "service_pediatric",
                "service_women",
                "service_pain",
                "service_lab",
                CANCEL_BOOKING_DATA,
            ]
        );
    }

    #[test]
    fn test_welcome_keyboard() {
        assert_eq!(
            callback_data(&create_welcome_keyboard()),
            vec![BEGIN_BOOKING_DATA, CANCEL_BOOKING_DATA]
        );
    }

    #[test]
    fn test_start_again_keyboard() {
        assert_eq!(
            callback_data(&create_start_again_keyboard()),
            vec![BEGIN_BOOKING_DATA]
        );
    }
}

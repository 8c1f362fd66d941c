//! Booking dialogue module: the per-chat conversation state.
//!
//! Each variant of [`BookingState`] carries exactly the answers collected so
//! far, so a field can only exist once the conversation has passed its step.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::Dialogue;

use crate::session_store::SessionStorage;

/// Services offered in the booking menu
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Checkup,
    Pediatric,
    Women,
    Pain,
    Lab,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Service::Checkup,
        Service::Pediatric,
        Service::Women,
        Service::Pain,
        Service::Lab,
    ];

    /// Full bilingual name, stored in the booking and shown in summaries
    pub fn label(self) -> &'static str {
        match self {
            Service::Checkup => "የጤና ምርመራ እና ምክር / Check-up & Advice",
            Service::Pediatric => "የህፃናት እና አባላት እንክብካቤ / Pediatric & Family Care",
            Service::Women => "የሴቶች ጤና / Women's Health",
            Service::Pain => "የህመም መቆጣጠሪያ / Pain Management",
            Service::Lab => "የምርመራ ክፍል / Lab Services",
        }
    }

    /// Short caption for the menu button
    pub fn button_label(self) -> &'static str {
        match self {
            Service::Checkup => "ምርመራ እና ምክር / Check-up",
            Service::Pediatric => "የህፃናት እንክብካቤ / Pediatric",
            Service::Women => "የሴቶች ጤና / Women's Health",
            Service::Pain => "የህመም መቆጣጠሪያ / Pain",
            Service::Lab => "የምርመራ ክፍል / Lab",
        }
    }

    pub fn callback_data(self) -> &'static str {
        match self {
            Service::Checkup => "service_checkup",
            Service::Pediatric => "service_pediatric",
            Service::Women => "service_women",
            Service::Pain => "service_pain",
            Service::Lab => "service_lab",
        }
    }

    pub fn from_callback_data(data: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|service| service.callback_data() == data)
    }
}

/// Position of a conversation within the booking sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStep {
    AwaitingName,
    AwaitingContact,
    AwaitingService,
    AwaitingDatetime,
    AwaitingMessage,
    Complete,
}

/// In-progress booking for one chat
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingState {
    #[default]
    AwaitingName,
    AwaitingContact {
        full_name: String,
    },
    AwaitingService {
        full_name: String,
        contact: String,
    },
    AwaitingDatetime {
        full_name: String,
        contact: String,
        service: Service,
    },
    AwaitingMessage {
        full_name: String,
        contact: String,
        service: Service,
        datetime: String,
    },
}

/// Type alias for a chat's booking dialogue
pub type BookingDialogue = Dialogue<BookingState, SessionStorage>;

/// Result of feeding typed text into a session
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextOutcome {
    /// The text was stored; the session moved to this state
    Advanced(BookingState),
    /// The last answer arrived; the session is finished
    Completed(Booking),
    /// Text is not accepted at this step (the service must be picked with a button)
    ExpectsButton,
}

impl BookingState {
    pub fn step(&self) -> BookingStep {
        match self {
            BookingState::AwaitingName => BookingStep::AwaitingName,
            BookingState::AwaitingContact { .. } => BookingStep::AwaitingContact,
            BookingState::AwaitingService { .. } => BookingStep::AwaitingService,
            BookingState::AwaitingDatetime { .. } => BookingStep::AwaitingDatetime,
            BookingState::AwaitingMessage { .. } => BookingStep::AwaitingMessage,
        }
    }

    /// Store typed text as the answer for the current step
    pub fn accept_text(self, text: &str) -> TextOutcome {
        let text = text.to_string();
        match self {
            BookingState::AwaitingName => {
                TextOutcome::Advanced(BookingState::AwaitingContact { full_name: text })
            }
            BookingState::AwaitingContact { full_name } => {
                TextOutcome::Advanced(BookingState::AwaitingService {
                    full_name,
                    contact: text,
                })
            }
            BookingState::AwaitingService { .. } => TextOutcome::ExpectsButton,
            BookingState::AwaitingDatetime {
                full_name,
                contact,
                service,
            } => TextOutcome::Advanced(BookingState::AwaitingMessage {
                full_name,
                contact,
                service,
                datetime: text,
            }),
            BookingState::AwaitingMessage {
                full_name,
                contact,
                service,
                datetime,
            } => TextOutcome::Completed(Booking {
                full_name,
                contact,
                service,
                datetime,
                message: text,
            }),
        }
    }

    /// Store the chosen service. Returns `None` unless the session is at the
    /// service step.
    pub fn select_service(&self, service: Service) -> Option<BookingState> {
        match self {
            BookingState::AwaitingService { full_name, contact } => {
                Some(BookingState::AwaitingDatetime {
                    full_name: full_name.clone(),
                    contact: contact.clone(),
                    service,
                })
            }
            _ => None,
        }
    }

    pub fn full_name(&self) -> Option<&str> {
        match self {
            BookingState::AwaitingName => None,
            BookingState::AwaitingContact { full_name }
            | BookingState::AwaitingService { full_name, .. }
            | BookingState::AwaitingDatetime { full_name, .. }
            | BookingState::AwaitingMessage { full_name, .. } => Some(full_name.as_str()),
        }
    }

    pub fn contact(&self) -> Option<&str> {
        match self {
            BookingState::AwaitingService { contact, .. }
            | BookingState::AwaitingDatetime { contact, .. }
            | BookingState::AwaitingMessage { contact, .. } => Some(contact.as_str()),
            _ => None,
        }
    }

    pub fn service(&self) -> Option<Service> {
        match self {
            BookingState::AwaitingDatetime { service, .. }
            | BookingState::AwaitingMessage { service, .. } => Some(*service),
            _ => None,
        }
    }

    pub fn datetime(&self) -> Option<&str> {
        match self {
            BookingState::AwaitingMessage { datetime, .. } => Some(datetime.as_str()),
            _ => None,
        }
    }
}

/// A finished booking with every answer present
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    pub full_name: String,
    pub contact: String,
    pub service: Service,
    pub datetime: String,
    pub message: String,
}

impl Booking {
    pub fn step(&self) -> BookingStep {
        BookingStep::Complete
    }
}

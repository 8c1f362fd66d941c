//! # Clinic Booking Bot
//!
//! A Telegram bot that walks a patient through a short appointment request
//! (name, contact, service, preferred time, message) and forwards the result
//! to the patient and to the clinic's admin chat.

pub mod bot;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod polling;
pub mod session_store;
pub mod shutdown;
pub mod summary;
pub mod texts;
pub mod webhook;

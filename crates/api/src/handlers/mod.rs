pub mod clients;
pub mod events;
pub mod poll;
pub mod webhook;

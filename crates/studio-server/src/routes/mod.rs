pub mod analyze;
pub mod billing;
pub mod calendar;
pub mod flags;
pub mod goals;
pub mod health;
pub mod ideas;
pub mod pillars;
pub mod tasks;
pub mod webhooks;

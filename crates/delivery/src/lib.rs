//! Herald delivery engine.
//!
//! Executes one welcome-message job end to end:
//! 1. Resolve the user's send credentials and locale (`users`)
//! 2. Render the localized welcome text (`localize`)
//! 3. Attempt the send through the messaging provider (`provider`)
//! 4. On a structured provider failure, classify each error entry
//!    (`classifier`) and drive the matching side effect: persist a status
//!    change, schedule a delayed retry (`scheduler`), or escalate (`error`)

pub mod classifier;
pub mod error;
pub mod localize;
pub mod provider;
pub mod scheduler;
pub mod task;
pub mod users;

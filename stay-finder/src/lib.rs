//! Lodging finder for rail travellers.
//!
//! Answers: "where along the metro can I stay most cheaply, all things
//! considered, if I need to be at this station?" Lodging near every
//! reachable station is priced together with the round-trip fare, then
//! ranked by price, rating or cost-performance against a baseline stay.

pub mod domain;
pub mod fare;
pub mod lodging;
pub mod network;
pub mod odpt;
pub mod planner;
pub mod providers;
pub mod schedule;
pub mod snapshot;
pub mod topology;
pub mod walking;

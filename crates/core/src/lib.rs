//! Domain logic for the Encore idol-agency backend.
//!
//! Everything in this crate is pure: formulas take the current time and a
//! [`rand::Rng`] as explicit parameters, so every roll is reproducible in
//! tests with a seeded generator. Persistence and HTTP live in `encore-db`
//! and `encore-api`.

pub mod error;
pub mod events;
pub mod group;
pub mod idol;
pub mod ledger;
pub mod manager;
pub mod promotion;
pub mod song;
pub mod types;
pub mod upgrade;

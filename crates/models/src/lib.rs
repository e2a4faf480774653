//! Entities for the gift registry: categories, items and their reservations.

pub mod errors;
pub mod db;
pub mod category;
pub mod item;
pub mod reservation;

//! Storage abstractions for service layer
//!
//! File-backed resources that live next to the database rows, currently the
//! uploaded item images.

pub mod image_store;

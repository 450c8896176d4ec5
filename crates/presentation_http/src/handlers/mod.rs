//! HTTP request handlers

pub mod bookings;
pub mod carriers;
pub mod common;
pub mod distance;
pub mod health;
pub mod index;
pub mod webhook;

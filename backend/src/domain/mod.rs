//! # Domain Module
//!
//! Booking logic of the reservation client. Every flow composes the single
//! weekly slot grid from `shared::schedule`; nothing here re-declares the day
//! or hour-block lists.
//!
//! ## Module Organization
//!
//! - **schedule_service**: availability and selection grids for renderers
//! - **booking**: errors and user lookup shared by the booking forms
//! - **room_booking**: reserve a room for one slot
//! - **element_booking**: borrow recreational elements for one slot
//! - **reservation_lookup**: search, list per user, cancel
//! - **catalog_service**: rooms and elements, plus admin create/delete
//! - **return_register**: record elements handed back for a reservation
//!
//! All remote calls go through [`crate::io::ReservationApi`].

pub mod booking;
pub mod catalog_service;
pub mod element_booking;
pub mod reservation_lookup;
pub mod return_register;
pub mod room_booking;
pub mod schedule_service;

#[cfg(test)]
pub mod test_utils;

pub use booking::*;
pub use catalog_service::*;
pub use element_booking::*;
pub use reservation_lookup::*;
pub use return_register::*;
pub use room_booking::*;
pub use schedule_service::*;

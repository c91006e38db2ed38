//! # IO Module
//!
//! Interface layer between the domain services and the remote reservation
//! service. The domain only sees the [`ReservationApi`] trait; the HTTP
//! implementation lives in [`http`].

pub mod api;
pub mod http;

pub use api::*;
pub use http::HttpReservationApi;

//! Shared model and pure logic for the e-signing service.
//!
//! Everything in this crate is synchronous and free of I/O so it can be used
//! by the HTTP backend and by any client that wants to pre-render documents or
//! capture signatures locally.

pub mod fields;
pub mod model;
pub mod requests;
pub mod signature;
pub mod view;

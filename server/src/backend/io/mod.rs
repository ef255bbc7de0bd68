//! # IO Module
//!
//! The HTTP face of the backend. Handlers translate JSON requests into
//! domain calls and domain results into responses; no business rules live
//! here.

pub mod rest;

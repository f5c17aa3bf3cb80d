//! Common Library
//!
//! Shared building blocks between the Identity Service and the Ledger
//! Service: the two JWT contracts (user tokens and service-to-service
//! tokens) and the wire types of the token-validation endpoint.

pub mod contracts;
pub mod jwt;

//! Session ownership.
//!
//! [`session_store::SessionStore`] is the single owner of the [`Session`](empower_domain::Session);
//! every other component mutates it through the store's contract.

pub mod session_store;

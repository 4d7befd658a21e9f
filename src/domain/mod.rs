//! Domain types for the lending policy engine.
//!
//! Identifier formats (`Isbn`, `PatronId`) and record invariants are enforced
//! at construction so the policy functions never re-validate shapes ad hoc.

pub mod book;
pub mod fee;
pub mod loan;
pub mod patron;
pub mod ports;

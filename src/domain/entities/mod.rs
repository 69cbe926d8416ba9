//! Core domain entities.
//!
//! The service persists exactly one kind of record: a [`ShortLink`] mapping a
//! generated code to the URL it stands for, together with a hit counter.
//!
//! A link has two states, absent and present. It becomes present on a
//! successful create-if-absent write and never goes back.

pub mod short_link;

pub use short_link::ShortLink;

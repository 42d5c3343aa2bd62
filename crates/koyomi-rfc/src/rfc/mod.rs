//! RFC codecs grouped by format family.

pub mod datetime;

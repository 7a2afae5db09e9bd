//! Reading expense records from text.

pub mod source;

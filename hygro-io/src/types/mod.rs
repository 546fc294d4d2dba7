//! Common data types

pub mod humidity;

pub use humidity::*;

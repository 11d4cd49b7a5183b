//! Register layouts and fixed addresses.

pub mod pl022;

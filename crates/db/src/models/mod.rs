//! Row structs read back from the store.

pub mod grant;

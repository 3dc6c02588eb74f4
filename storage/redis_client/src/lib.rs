pub mod client;
pub mod fingerprint_store;

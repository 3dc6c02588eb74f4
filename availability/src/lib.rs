pub mod contracts;
pub mod criteria;
pub mod data_transfer;
pub mod fingerprint;
pub mod merge;
pub mod normalize;
pub mod render;

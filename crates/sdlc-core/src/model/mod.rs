//! Value types shared by the codec, the API contracts, and the backends.

pub mod types;

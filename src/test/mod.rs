//! Helpers for crafting custom debug info blobs and providers in unit tests
//!
//! Blobs are built record by record with [`CdiBuilder`]; [`TestProvider`] serves them
//! (and import strings) to the resolvers by method token.


pub use builders::{dynamic_bucket_bytes, CdiBuilder};
pub use provider::TestProvider;

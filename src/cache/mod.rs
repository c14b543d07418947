pub mod keys;
pub mod mutations;
pub mod store;

pub use keys::{Bucket, QueryKey};
pub use mutations::{Mutation, MutationCoordinator};
pub use store::QueryCache;

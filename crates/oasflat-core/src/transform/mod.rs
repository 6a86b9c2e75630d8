pub mod flatten;
pub mod name_normalizer;
pub mod signature;

pub use flatten::{FlattenSession, InlineModelResolver, flatten};

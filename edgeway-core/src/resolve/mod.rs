mod candidates;
mod resolver;

pub use candidates::Candidates;
pub use resolver::{ObjectKeyResolver, Resolution};

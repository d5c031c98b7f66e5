mod ambiguity;
mod path;
#[cfg(test)]
mod tests;
mod types;

pub use ambiguity::*;
pub use path::*;
pub use types::*;

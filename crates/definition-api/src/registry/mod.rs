mod builder;
mod kind;
mod store;

pub use builder::DefinitionBuilder;
pub use kind::{AttributeBuilder, KindBuilder};
pub use store::KindRegistry;

#[cfg(test)]
mod tests;

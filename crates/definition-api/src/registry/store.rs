use std::collections::HashMap;
use std::sync::Arc;

use super::KindBuilder;

/// Builders for one definition family, keyed by their `type` value.
///
/// Registration order is preserved for listing; registering a kind twice
/// replaces the earlier builder in place.
#[derive(Clone, Default)]
pub struct KindRegistry {
    builders: Vec<Arc<dyn KindBuilder>>,
    index: HashMap<&'static str, usize>,
}

impl KindRegistry {
    /// Create an empty registry without any builders registered.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Register or replace the builder for its declared kind.
    pub fn register<B>(&mut self, builder: B)
    where
        B: KindBuilder + 'static,
    {
        let kind = builder.kind();
        let builder = Arc::new(builder) as Arc<dyn KindBuilder>;
        if let Some(position) = self.index.get(kind).copied() {
            self.builders[position] = builder;
        } else {
            self.index.insert(kind, self.builders.len());
            self.builders.push(builder);
        }
    }

    /// Lookup the builder registered for `kind`.
    pub fn builder(&self, kind: &str) -> Option<Arc<dyn KindBuilder>> {
        self.index
            .get(kind)
            .and_then(|position| self.builders.get(*position).cloned())
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.index.contains_key(kind)
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.builders.iter().map(|builder| builder.kind())
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

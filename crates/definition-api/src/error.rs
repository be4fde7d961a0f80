use thiserror::Error;

use crate::definition::DefinitionKind;

/// Errors raised while turning an attribute record into a [`Definition`](crate::Definition).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// No builder is registered for the record's `type`.
    #[error("unknown {kind} type \"{type_name}\"")]
    UnknownType {
        kind: DefinitionKind,
        type_name: String,
    },

    /// The record has no usable `type` attribute.
    #[error("the {kind} definition has no \"type\" attribute")]
    MissingType { kind: DefinitionKind },

    /// A builder requires an attribute the record does not provide.
    #[error("missing required attribute \"{attribute}\"")]
    MissingAttribute { attribute: &'static str },

    /// A builder rejected the value of an attribute.
    #[error("invalid value for attribute \"{attribute}\": {reason}")]
    InvalidAttribute {
        attribute: String,
        reason: String,
    },
}

impl BuildError {
    pub fn unknown_type(kind: DefinitionKind, type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            kind,
            type_name: type_name.into(),
        }
    }

    pub fn invalid_attribute(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}

use serde::{Deserialize, Serialize};

/// Reasons a declaration cannot receive a setter function
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetterError {
    /// The attribute is attached to something other than a variable
    #[error("This macro can only be applied to variables")]
    NotAVariable,

    /// The declaration uses `let`
    #[error("This macro cannot be used on a constant")]
    NotSettable,

    /// The binding pattern is a tuple or wildcard
    #[error("The property must have a simple identifier")]
    ComplexIdentifier,

    /// The type is only inferred from the initializer
    #[error("Due to macro limitations, the property type must be specified")]
    TypeMissing,

    /// The binding has accessors but no setter and is not observer-only
    #[error("This macro cannot be used on computed properties")]
    Computed,
}

impl SetterError {
    pub const ALL: [SetterError; 5] = [
        SetterError::NotAVariable,
        SetterError::NotSettable,
        SetterError::ComplexIdentifier,
        SetterError::TypeMissing,
        SetterError::Computed,
    ];

    /// Stable code for machine-readable output
    pub fn kind(self) -> &'static str {
        match self {
            SetterError::NotAVariable => "not_a_variable",
            SetterError::NotSettable => "not_settable",
            SetterError::ComplexIdentifier => "complex_identifier",
            SetterError::TypeMissing => "type_missing",
            SetterError::Computed => "computed",
        }
    }
}

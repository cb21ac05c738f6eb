use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Structured runtime error with a stable internal classification.
/// Advisory conditions (index collisions, missing-index scans) are not
/// errors; they flow through `obs` instead.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct Error {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct a store-origin I/O failure.
    pub(crate) fn store_io(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Io, ErrorOrigin::Store, message.into())
    }

    /// Construct a configuration error for a specific origin.
    pub(crate) fn config(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Config, origin, message.into())
    }

    /// Construct a query-origin unknown-attribute error.
    pub(crate) fn unknown_attribute(class_name: &str, attribute: &str) -> Self {
        Self::new(
            ErrorClass::UnknownAttribute,
            ErrorOrigin::Query,
            format!("unknown attribute '{attribute}' on record class '{class_name}'"),
        )
    }

    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(self.class, ErrorClass::Config)
    }

    #[must_use]
    pub const fn is_unknown_attribute(&self) -> bool {
        matches!(self.class, ErrorClass::UnknownAttribute)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    /// Source file unreadable; fatal to the first store build.
    Io,
    /// A call that cannot be satisfied by the configured class model.
    Config,
    /// Attribute name never produced by any record of the class.
    UnknownAttribute,
    /// Registration conflict in the class registry.
    Conflict,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Io => "io",
            Self::Config => "config",
            Self::UnknownAttribute => "unknown_attribute",
            Self::Conflict => "conflict",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Store,
    Query,
    Association,
    Registry,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Store => "store",
            Self::Query => "query",
            Self::Association => "association",
            Self::Registry => "registry",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_class_includes_origin_and_class() {
        let err = Error::config(ErrorOrigin::Query, "no primary key configured");
        assert_eq!(
            err.display_with_class(),
            "query:config: no primary key configured"
        );
    }

    #[test]
    fn unknown_attribute_names_class_and_attribute() {
        let err = Error::unknown_attribute("orders", "_shipped_at");
        assert!(err.is_unknown_attribute());
        assert_eq!(err.origin, ErrorOrigin::Query);
        assert!(err.message.contains("'_shipped_at'"));
        assert!(err.message.contains("'orders'"));
    }
}

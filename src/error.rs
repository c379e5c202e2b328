//! Typed error handling for hessian-enumer.
//!
//! Every extraction failure is fatal by design: the generator is
//! deterministic and idempotent, so the recovery path is fixing the
//! annotated source and re-running. Components return these errors
//! instead of terminating; only `main` decides the process exit.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnumerError {
    /// No class-name source available for a marked type.
    #[error("type {type_name}: {message}")]
    Configuration { type_name: String, message: String },

    /// A constant violates the type-name prefix/suffix rules.
    #[error("constant {name}: {message}")]
    Naming { name: String, message: String },

    /// Conflicting types within one constant group, or a type re-opened
    /// across non-contiguous groups.
    #[error("type {type_name}: {message}")]
    TypeConsistency { type_name: String, message: String },

    /// A constant in an enumeration group is not integer-valued.
    #[error("constant {name}: {message}")]
    TypeKind { name: String, message: String },

    /// The frontend cannot resolve an identifier to a value.
    #[error("cannot resolve {name}: {message}")]
    Lookup { name: String, message: String },

    /// A registered type ended the scan with no members or no class name.
    #[error("type {type_name}: {message}")]
    EmptySpec { type_name: String, message: String },

    /// Structural error while parsing a source unit.
    #[error("{path}:{line}: {message}", path = .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// I/O error with path context.
    #[error("I/O error at {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnumerError {
    pub fn configuration(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn naming(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Naming {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn type_consistency(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeConsistency {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn type_kind(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::TypeKind {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn lookup(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Lookup {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn empty_spec(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::EmptySpec {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EnumerError>;

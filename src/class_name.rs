//! External class name resolution.
//!
//! The single point deciding what Java class a generated enumeration maps
//! to: a directive-supplied name wins verbatim, otherwise the configured
//! package prefix is joined with the Go type name. Deterministic and
//! idempotent; a type with neither source is a configuration error.

use regex::Regex;
use std::sync::OnceLock;

use crate::error::{EnumerError, Result};

fn class_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$").unwrap()
    })
}

/// Resolves the external class name for one marked type.
pub fn resolve(
    type_name: &str,
    directive_class: Option<&str>,
    package_prefix: &str,
) -> Result<String> {
    let resolved = match directive_class.filter(|c| !c.is_empty()) {
        Some(class) => class.to_string(),
        None => {
            if package_prefix.is_empty() {
                return Err(EnumerError::configuration(
                    type_name,
                    "no java class name: add a class= directive or configure a package prefix",
                ));
            }
            format!("{}.{}", package_prefix, type_name)
        }
    };

    if !class_name_pattern().is_match(&resolved) {
        return Err(EnumerError::configuration(
            type_name,
            format!("resolved class name {:?} is not a valid java identifier", resolved),
        ));
    }

    Ok(resolved)
}

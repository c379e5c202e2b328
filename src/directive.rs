//! Parsing of one annotation comment body into configuration keys.
//!
//! The body is the text after the `//go:hessian` sentinel. Tokens are
//! whitespace-separated `key=value` pairs; only `class` and `c` are
//! recognized. Malformed or unknown tokens are ignored, never fatal, and
//! an absent class name is a meaningful result handled downstream.

/// Key/value configuration carried by one annotation comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directive {
    /// Candidate external class name (`class=` / `c=`), if any.
    pub class: Option<String>,
}

impl Directive {
    pub fn class_name(&self) -> Option<&str> {
        self.class.as_deref().filter(|c| !c.is_empty())
    }
}

/// Parses a directive comment body.
pub fn parse(body: &str) -> Directive {
    let mut directive = Directive::default();

    for token in body.split_whitespace() {
        let parts: Vec<&str> = token.split('=').collect();
        if parts.len() != 2 {
            // bare flags and over-split tokens carry nothing yet
            continue;
        }
        match parts[0] {
            "class" | "c" => {
                if !parts[1].is_empty() {
                    directive.class = Some(parts[1].to_string());
                }
            }
            _ => {}
        }
    }

    directive
}

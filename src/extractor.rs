//! The extraction core.
//!
//! One forward pass over a unit's declarations, in source order,
//! producing the unit's enumeration specs or failing on the first
//! violation. All accumulation happens in an explicit builder threaded
//! through the scan; nothing is global, and nothing here terminates the
//! process.

pub mod enum_spec;

pub use enum_spec::{EnumMember, EnumSpec};

use std::collections::HashMap;

use crate::class_name;
use crate::config::NamingConfig;
use crate::directive;
use crate::error::{EnumerError, Result};
use crate::frontend::{ConstGroup, ConstKind, Declaration, SourceUnit, TypeAlias};

/// Markers and namespaces the extractor works against.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    pub package_prefix: String,
    pub sentinel: String,
    pub marker: String,
    pub discard: String,
}

impl From<&NamingConfig> for ExtractOptions {
    fn from(naming: &NamingConfig) -> Self {
        Self {
            package_prefix: naming.package_prefix.clone(),
            sentinel: naming.sentinel.clone(),
            marker: naming.marker.clone(),
            discard: naming.discard.clone(),
        }
    }
}

/// Extracts all enumeration specs from one compilation unit.
///
/// Member order follows source declaration order exactly; the returned
/// specs are in first-recognition order.
pub fn extract_unit(unit: &SourceUnit, opts: &ExtractOptions) -> Result<Vec<EnumSpec>> {
    let mut builder = SpecSetBuilder::default();

    for (decl_id, decl) in unit.decls.iter().enumerate() {
        match decl {
            Declaration::TypeAlias(alias) => scan_type_alias(alias, opts, &mut builder)?,
            Declaration::ConstGroup(group) => {
                scan_const_group(unit, group, decl_id, opts, &mut builder)?
            }
        }
    }

    builder.finish(unit)
}

fn scan_type_alias(
    alias: &TypeAlias,
    opts: &ExtractOptions,
    builder: &mut SpecSetBuilder,
) -> Result<()> {
    // most type aliases are irrelevant
    if !alias.underlying.is_qualified() || alias.underlying.name != opts.marker {
        return Ok(());
    }

    let directive = alias
        .doc
        .iter()
        .find_map(|line| line.trim().strip_prefix(opts.sentinel.as_str()))
        .map(directive::parse)
        .unwrap_or_default();

    let class = class_name::resolve(
        &alias.name,
        directive.class_name(),
        &opts.package_prefix,
    )?;
    builder.set_class_name(&alias.name, class);
    Ok(())
}

fn scan_const_group(
    unit: &SourceUnit,
    group: &ConstGroup,
    group_id: usize,
    opts: &ExtractOptions,
    builder: &mut SpecSetBuilder,
) -> Result<()> {
    // scoped strictly to this group
    let mut inherited: Option<&str> = None;

    for entry in &group.entries {
        if entry.name == opts.discard {
            continue;
        }

        let nominal = match &entry.explicit_type {
            Some(declared) => {
                if !is_marker_alias(unit, declared, &opts.marker) {
                    // a group typed with anything else is not an
                    // enumeration group; keep what was already taken
                    return Ok(());
                }
                if let Some(established) = inherited {
                    if established != declared {
                        return Err(EnumerError::type_consistency(
                            established,
                            format!(
                                "constant group declares both {} and {}",
                                established, declared
                            ),
                        ));
                    }
                }
                inherited = Some(declared.as_str());
                declared.as_str()
            }
            None => match inherited {
                Some(established) => established,
                // extraction begins once an entry establishes the type
                None => continue,
            },
        };

        let local = match entry.name.strip_prefix(nominal) {
            Some(suffix) if !suffix.is_empty() => suffix,
            _ => {
                return Err(EnumerError::naming(
                    &entry.name,
                    format!("missing type name prefix {:?}", nominal),
                ))
            }
        };
        if local == opts.discard {
            return Err(EnumerError::naming(
                &entry.name,
                format!("name reduces to the discard marker {:?}", opts.discard),
            ));
        }

        let resolved = unit.lookup(&entry.name).ok_or_else(|| {
            EnumerError::lookup(&entry.name, "value did not resolve to a constant")
        })?;
        if resolved.kind != ConstKind::Int {
            return Err(EnumerError::type_kind(
                &entry.name,
                format!(
                    "{} constant in enumeration type {}",
                    resolved.kind.describe(),
                    nominal
                ),
            ));
        }

        let literal = resolved
            .literal
            .clone()
            .unwrap_or_else(|| resolved.value.to_string());

        builder.append_member(
            nominal,
            group_id,
            EnumMember {
                qualified_name: entry.name.clone(),
                local_name: local.to_string(),
                value: resolved.value,
                signed: resolved.signed,
                literal,
            },
        )?;
    }

    Ok(())
}

/// Whether a unit-local type name is declared directly over the marker.
fn is_marker_alias(unit: &SourceUnit, type_name: &str, marker: &str) -> bool {
    unit.underlying_of(type_name)
        .is_some_and(|underlying| underlying.is_qualified() && underlying.name == marker)
}

/// Insertion-ordered accumulator for the specs of one unit.
#[derive(Default)]
struct SpecSetBuilder {
    index: HashMap<String, usize>,
    states: Vec<SpecState>,
}

struct SpecState {
    type_name: String,
    class_name: Option<String>,
    members: Vec<EnumMember>,
    /// Declaration id of the group that contributed members; a second
    /// group appending to the same type is a consistency violation.
    member_group: Option<usize>,
}

impl SpecSetBuilder {
    fn state_mut(&mut self, type_name: &str) -> &mut SpecState {
        let idx = match self.index.get(type_name) {
            Some(&idx) => idx,
            None => {
                self.index.insert(type_name.to_string(), self.states.len());
                self.states.push(SpecState {
                    type_name: type_name.to_string(),
                    class_name: None,
                    members: Vec::new(),
                    member_group: None,
                });
                self.states.len() - 1
            }
        };
        &mut self.states[idx]
    }

    fn set_class_name(&mut self, type_name: &str, class: String) {
        // a later alias for the same type overwrites
        self.state_mut(type_name).class_name = Some(class);
    }

    fn append_member(
        &mut self,
        type_name: &str,
        group_id: usize,
        member: EnumMember,
    ) -> Result<()> {
        let state = self.state_mut(type_name);
        if let Some(origin) = state.member_group {
            if origin != group_id {
                return Err(EnumerError::type_consistency(
                    type_name,
                    "type re-opened by a second constant group",
                ));
            }
        }
        state.member_group = Some(group_id);
        state.members.push(member);
        Ok(())
    }

    fn finish(self, unit: &SourceUnit) -> Result<Vec<EnumSpec>> {
        let mut specs = Vec::with_capacity(self.states.len());
        for state in self.states {
            let external_class_name = state.class_name.ok_or_else(|| {
                EnumerError::empty_spec(
                    &state.type_name,
                    "no marker type alias resolves its class name",
                )
            })?;
            if state.members.is_empty() {
                return Err(EnumerError::empty_spec(
                    &state.type_name,
                    "marked type declares no constants",
                ));
            }
            specs.push(EnumSpec {
                type_name: state.type_name,
                external_class_name,
                members: state.members,
                package: unit.package.clone(),
                source_file: unit.path.clone(),
            });
        }
        Ok(specs)
    }
}

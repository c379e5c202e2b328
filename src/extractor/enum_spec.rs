use std::path::PathBuf;

/// One constant belonging to a generated enumeration.
#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Full declared identifier, unique within its unit.
    pub qualified_name: String,
    /// `qualified_name` with the type-name prefix removed.
    pub local_name: String,
    /// Resolved integer value.
    pub value: i128,
    /// Signedness of the member's underlying type.
    pub signed: bool,
    /// Original literal text, or the canonical base-10 rendering.
    pub literal: String,
}

/// One enumeration type, finalized after a unit scan.
#[derive(Debug, Clone)]
pub struct EnumSpec {
    pub type_name: String,
    /// Fully qualified identifier in the target namespace.
    pub external_class_name: String,
    /// Members in source declaration order.
    pub members: Vec<EnumMember>,
    /// Go package the type was declared in.
    pub package: String,
    /// Source file of the unit, anchoring the generated file's location.
    pub source_file: PathBuf,
}

//! Renders one finalized enumeration spec into one generated Go file.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{EnumerError, Result};
use crate::extractor::EnumSpec;

pub struct DescriptorGenerator<'a> {
    suffix: &'a str,
}

impl<'a> DescriptorGenerator<'a> {
    pub fn new(suffix: &'a str) -> Self {
        Self { suffix }
    }

    /// Target path: same directory as the source file, lower-cased type
    /// name plus the configured suffix.
    pub fn target_path(&self, spec: &EnumSpec) -> PathBuf {
        let dir = spec.source_file.parent().unwrap_or_else(|| Path::new("."));
        dir.join(format!("{}{}", spec.type_name.to_lowercase(), self.suffix))
    }

    pub fn generate(&self, spec: &EnumSpec) -> String {
        let type_name = &spec.type_name;
        // members of one group share one underlying type
        let signed = spec.members.first().is_none_or(|m| m.signed);
        let cast = if signed { "int64" } else { "uint64" };

        let mut lines = vec![
            "// Code generated by hessian-enumer. DO NOT EDIT.".to_string(),
            String::new(),
            format!("package {}", spec.package),
            String::new(),
            "import (".to_string(),
            "\t\"fmt\"".to_string(),
            String::new(),
            "\thessian \"github.com/apache/dubbo-go-hessian2\"".to_string(),
            ")".to_string(),
            String::new(),
        ];

        let key_width = spec
            .members
            .iter()
            .map(|m| m.qualified_name.len())
            .max()
            .unwrap_or(0)
            + 1;
        lines.push(format!("var _{}Names = map[{}]string{{", type_name, type_name));
        for member in &spec.members {
            lines.push(format!(
                "\t{:<width$} \"{}\",",
                format!("{}:", member.qualified_name),
                member.local_name,
                width = key_width,
            ));
        }
        lines.push("}".to_string());
        lines.push(String::new());

        let local_width = spec
            .members
            .iter()
            .map(|m| m.local_name.len())
            .max()
            .unwrap_or(0)
            + 3;
        lines.push(format!("var _{}Values = map[string]{}{{", type_name, type_name));
        for member in &spec.members {
            lines.push(format!(
                "\t{:<width$} {}({}),",
                format!("\"{}\":", member.local_name),
                type_name,
                member.literal,
                width = local_width,
            ));
        }
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!("func (e {}) JavaClassName() string {{", type_name));
        lines.push(format!("\treturn \"{}\"", spec.external_class_name));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!("func (e {}) String() string {{", type_name));
        lines.push(format!("\tif name, ok := _{}Names[e]; ok {{", type_name));
        lines.push("\t\treturn name".to_string());
        lines.push("\t}".to_string());
        lines.push(format!(
            "\treturn fmt.Sprintf(\"{}(%d)\", {}(e))",
            type_name, cast
        ));
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!("func (e {}) EnumValue() int32 {{", type_name));
        lines.push("\treturn int32(e)".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push(format!(
            "func Get{}ByName(name string) ({}, bool) {{",
            type_name, type_name
        ));
        lines.push(format!("\te, ok := _{}Values[name]", type_name));
        lines.push("\treturn e, ok".to_string());
        lines.push("}".to_string());
        lines.push(String::new());

        lines.push("func init() {".to_string());
        lines.push(format!("\tfor e := range _{}Names {{", type_name));
        lines.push("\t\thessian.RegisterJavaEnum(e)".to_string());
        lines.push("\t}".to_string());
        lines.push("}".to_string());

        lines.join("\n") + "\n"
    }

    /// Writes the descriptor, skipping the write when the file already
    /// holds identical content. Returns the path and whether it wrote.
    pub fn write(&self, spec: &EnumSpec) -> Result<(PathBuf, bool)> {
        let path = self.target_path(spec);
        let content = self.generate(spec);

        if path.exists() {
            let existing =
                fs::read_to_string(&path).map_err(|e| EnumerError::io(&path, e))?;
            if existing == content {
                return Ok((path, false));
            }
        }

        fs::write(&path, &content).map_err(|e| EnumerError::io(&path, e))?;
        Ok((path, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::EnumMember;
    use tempfile::TempDir;

    fn pill_spec(dir: &Path) -> EnumSpec {
        EnumSpec {
            type_name: "Pill".to_string(),
            external_class_name: "com.acme.Pill".to_string(),
            members: vec![
                EnumMember {
                    qualified_name: "PillRed".to_string(),
                    local_name: "Red".to_string(),
                    value: 0,
                    signed: true,
                    literal: "0".to_string(),
                },
                EnumMember {
                    qualified_name: "PillGreen".to_string(),
                    local_name: "Green".to_string(),
                    value: 16,
                    signed: true,
                    literal: "0x10".to_string(),
                },
            ],
            package: "demo".to_string(),
            source_file: dir.join("pill.go"),
        }
    }

    #[test]
    fn test_target_path() {
        let spec = pill_spec(Path::new("/src/demo"));
        let generator = DescriptorGenerator::new("_enum.go");
        assert_eq!(
            generator.target_path(&spec),
            PathBuf::from("/src/demo/pill_enum.go")
        );
    }

    #[test]
    fn test_generated_content() {
        let spec = pill_spec(Path::new("/src/demo"));
        let content = DescriptorGenerator::new("_enum.go").generate(&spec);

        assert!(content.starts_with("// Code generated by hessian-enumer. DO NOT EDIT."));
        assert!(content.contains("package demo"));
        assert!(content.contains("return \"com.acme.Pill\""));
        assert!(content.contains("PillRed:"));
        assert!(content.contains("\"Green\""));
        // literal text survives into the value table
        assert!(content.contains("Pill(0x10)"));
        assert!(content.contains("func (e Pill) EnumValue() int32 {"));
        assert!(content.contains("hessian.RegisterJavaEnum(e)"));

        // declaration order preserved
        let red = content.find("PillRed").unwrap();
        let green = content.find("PillGreen").unwrap();
        assert!(red < green);
    }

    #[test]
    fn test_unsigned_fallback_cast() {
        let mut spec = pill_spec(Path::new("/src/demo"));
        for member in &mut spec.members {
            member.signed = false;
        }
        let content = DescriptorGenerator::new("_enum.go").generate(&spec);
        assert!(content.contains("uint64(e)"));
    }

    #[test]
    fn test_write_skips_unchanged() {
        let dir = TempDir::new().unwrap();
        let spec = pill_spec(dir.path());
        let generator = DescriptorGenerator::new("_enum.go");

        let (path, written) = generator.write(&spec).unwrap();
        assert!(written);
        assert!(path.exists());

        let (_, written_again) = generator.write(&spec).unwrap();
        assert!(!written_again);
    }

    #[test]
    fn test_write_overwrites_stale_content() {
        let dir = TempDir::new().unwrap();
        let spec = pill_spec(dir.path());
        let generator = DescriptorGenerator::new("_enum.go");
        let path = generator.target_path(&spec);

        std::fs::write(&path, "stale").unwrap();
        let (_, written) = generator.write(&spec).unwrap();
        assert!(written);
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "stale");
    }
}

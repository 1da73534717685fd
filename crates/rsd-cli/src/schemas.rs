//! # Schemas CLI — List loaded classes.
//!
//! ```bash
//! # Every class, its suffix, and its field count:
//! rsd schemas
//!
//! # Fields and enums of one class (by class name or suffix):
//! rsd schemas Mesh
//! rsd schemas .mesh
//! ```

use anyhow::{anyhow, Result};
use clap::Args;

use rsd_schema::{Schema, SchemaRegistry};

use crate::Settings;

/// Schemas subcommand arguments.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    /// Class name or file suffix to describe.
    pub class: Option<String>,
}

/// Execute the schemas subcommand.
pub fn run_schemas(args: &SchemasArgs, settings: &Settings) -> Result<u8> {
    let registry = settings.load_registry()?;
    match &args.class {
        None => print!("{}", list(&registry)),
        Some(name) => {
            let schema = find(&registry, name)
                .ok_or_else(|| anyhow!("no class or suffix named '{name}'"))?;
            print!("{}", describe(schema));
        }
    }
    Ok(0)
}

fn find<'r>(registry: &'r SchemaRegistry, name: &str) -> Option<&'r Schema> {
    registry
        .try_get_by_class_name(name)
        .or_else(|| registry.try_get_by_suffix(name))
}

/// One line per class, then a total.
pub fn list(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for schema in registry.schemas() {
        out.push_str(&format!(
            "  {:<24} {:<12} {} fields\n",
            schema.class_name(),
            schema.file_suffix().unwrap_or("-"),
            schema.field_count()
        ));
    }
    out.push_str(&format!("\nTotal: {} classes\n", registry.len()));
    out
}

/// Fields in declaration order, then the enums the class can see.
pub fn describe(schema: &Schema) -> String {
    let mut out = format!(
        "{} ({})\n",
        schema.class_name(),
        schema.file_suffix().unwrap_or("embedded only")
    );
    for (name, spec) in schema.fields() {
        out.push_str(&format!("  {name:<24} {spec}\n"));
    }
    for def in schema.enums() {
        let names: Vec<&str> = def.values().iter().map(|v| v.name.as_str()).collect();
        out.push_str(&format!("  enum {}: {}\n", def.name(), names.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::from_sources(vec![(
            "m.rsd",
            r#"<rsd_file>
                 <enum class_name="Topology"><value name="triangleList"/><value name="lineList"/></enum>
                 <rsd class_name="Part"><field name="name" type="String"/></rsd>
                 <rsd class_name="Mesh" file_suffix=".mesh">
                   <field name="topology" type="Topology"/>
                   <field name="parts" type="DynamicArray" element="Part"/>
                 </rsd>
               </rsd_file>"#,
        )])
        .unwrap()
    }

    #[test]
    fn test_list() {
        let text = list(&registry());
        assert!(text.contains("Part"));
        assert!(text.contains(".mesh"));
        assert!(text.contains("2 fields"));
        assert!(text.ends_with("Total: 2 classes\n"));
    }

    #[test]
    fn test_find_by_class_or_suffix() {
        let reg = registry();
        assert_eq!(find(&reg, "Mesh").unwrap().class_name(), "Mesh");
        assert_eq!(find(&reg, "MESH").unwrap().class_name(), "Mesh");
        assert!(find(&reg, "Nothing").is_none());
    }

    #[test]
    fn test_describe() {
        let reg = registry();
        let text = describe(reg.try_get_by_class_name("Mesh").unwrap());
        assert!(text.starts_with("Mesh (.mesh)\n"));
        assert!(text.contains("Enum<Topology>"));
        assert!(text.contains("DynamicArray<Part>"));
        assert!(text.contains("enum Topology: triangleList, lineList"));
    }
}

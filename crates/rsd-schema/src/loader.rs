//! # `.rsd` Schema File Loader
//!
//! Turns one schema file into the [`Schema`]s it declares. Two file forms
//! coexist in content repositories:
//!
//! - **Legacy**: the root is `<rsd class_name="Mesh" file_suffix=".mesh">`
//!   and declares exactly one class.
//! - **Extended**: the root is `<rsd_file>`, holding `<enum class_name="..">`
//!   blocks and any number of `<rsd>` class blocks. Enums are visible to
//!   every class in the same file.
//!
//! ## Field Attribute Forms
//!
//! A `<field name=".." type="..">` either carries a full inline specifier
//! (`type="DynamicArray<Float>"`) or a bare container keyword plus
//! arguments as attributes:
//!
//! | `type`           | extra attributes                         |
//! |------------------|------------------------------------------|
//! | `Map`            | `key`, `value`                           |
//! | `DynamicArray`   | `element` (+ `target` for references)    |
//! | `StaticArray`    | `element`, `count` (`size`, `n`)         |
//! | `AssetReference` | `target`                                 |
//!
//! A bare type naming an enum of the same file becomes `Enum<Name>`.

use indexmap::IndexMap;
use rsd_core::{eq_ignore_case, EnumDef, EnumValue, TypeSpec, TypeSpecError, XmlElement};

use crate::error::SchemaLoadError;
use crate::schema::Schema;

/// Parse the text of one schema file. `file` names it in errors.
///
/// # Errors
///
/// Any structural problem in the file; see [`SchemaLoadError`].
pub fn parse_schema_file(source: &str, file: &str) -> Result<Vec<Schema>, SchemaLoadError> {
    let root = XmlElement::parse(source).map_err(|source| SchemaLoadError::Xml {
        file: file.to_string(),
        source,
    })?;
    parse_schema_document(&root, file)
}

/// Interpret an already-parsed schema document.
///
/// # Errors
///
/// Any structural problem in the file; see [`SchemaLoadError`].
pub fn parse_schema_document(root: &XmlElement, file: &str) -> Result<Vec<Schema>, SchemaLoadError> {
    match root.name.as_str() {
        "rsd" => Ok(vec![parse_class(root, file, &IndexMap::new())?]),
        "rsd_file" => {
            let mut enums: IndexMap<String, EnumDef> = IndexMap::new();
            for el in root.children_named("enum") {
                let def = parse_enum(el, file)?;
                if enums.contains_key(def.name()) {
                    return Err(SchemaLoadError::DuplicateEnum {
                        file: file.to_string(),
                        enum_name: def.name().to_string(),
                    });
                }
                enums.insert(def.name().to_string(), def);
            }

            let classes = root
                .children_named("rsd")
                .map(|el| parse_class(el, file, &enums))
                .collect::<Result<Vec<_>, _>>()?;
            if classes.is_empty() {
                return Err(SchemaLoadError::NoClassDeclared {
                    file: file.to_string(),
                });
            }
            Ok(classes)
        }
        other => Err(SchemaLoadError::UnknownRootElement {
            file: file.to_string(),
            element: other.to_string(),
        }),
    }
}

fn required<'a>(
    el: &'a XmlElement,
    file: &str,
    attribute: &'static str,
    element: impl FnOnce() -> String,
) -> Result<&'a str, SchemaLoadError> {
    el.non_empty_attribute(attribute)
        .ok_or_else(|| SchemaLoadError::MissingAttribute {
            file: file.to_string(),
            element: element(),
            attribute,
        })
}

fn parse_enum(el: &XmlElement, file: &str) -> Result<EnumDef, SchemaLoadError> {
    let name = match el.non_empty_attribute("class_name") {
        Some(name) => name,
        None => required(el, file, "name", || "<enum>".to_string())?,
    };

    let mut values = Vec::new();
    let mut next = 0u64;
    for v in el.children_named("value") {
        let value_name = required(v, file, "name", || format!("a value of enum '{name}'"))?;
        let numeric = match v.non_empty_attribute("value") {
            Some(text) => text
                .parse::<u64>()
                .map_err(|_| SchemaLoadError::InvalidEnumValue {
                    file: file.to_string(),
                    enum_name: name.to_string(),
                    value: text.to_string(),
                })?,
            None => next,
        };
        next = numeric.saturating_add(1);
        values.push(
            EnumValue::new(value_name, numeric)
                .with_display(v.attribute("display").unwrap_or_default().trim())
                .with_alias(v.attribute("alias").unwrap_or_default().trim()),
        );
    }

    if values.is_empty() {
        return Err(SchemaLoadError::EmptyEnum {
            file: file.to_string(),
            enum_name: name.to_string(),
        });
    }
    EnumDef::new(name, values).map_err(|source| SchemaLoadError::DuplicateEnumValue {
        file: file.to_string(),
        source,
    })
}

fn parse_class(
    el: &XmlElement,
    file: &str,
    enums: &IndexMap<String, EnumDef>,
) -> Result<Schema, SchemaLoadError> {
    let class_name = required(el, file, "class_name", || "<rsd>".to_string())?;
    let mut schema = Schema::new(class_name, el.non_empty_attribute("file_suffix"));
    for def in enums.values() {
        schema.add_enum(def.clone());
    }

    for field in el.children_named("field") {
        let name = required(field, file, "name", || {
            format!("a field of class '{class_name}'")
        })?;
        let ctx = FieldContext {
            file,
            class_name,
            field: name,
            enums,
        };
        let spec = ctx.field_type(field)?;
        tracing::trace!(class = class_name, field = name, spec = %spec, "schema field");
        if !schema.add_field(name, spec) {
            return Err(SchemaLoadError::DuplicateField {
                file: file.to_string(),
                class_name: class_name.to_string(),
                field: name.to_string(),
            });
        }
    }
    Ok(schema)
}

struct FieldContext<'a> {
    file: &'a str,
    class_name: &'a str,
    field: &'a str,
    enums: &'a IndexMap<String, EnumDef>,
}

impl FieldContext<'_> {
    fn missing(&self, attribute: &'static str) -> SchemaLoadError {
        SchemaLoadError::MissingAttribute {
            file: self.file.to_string(),
            element: format!("field '{}' of class '{}'", self.field, self.class_name),
            attribute,
        }
    }

    fn require<'e>(&self, el: &'e XmlElement, attribute: &'static str) -> Result<&'e str, SchemaLoadError> {
        el.non_empty_attribute(attribute)
            .ok_or_else(|| self.missing(attribute))
    }

    fn invalid(&self, source: TypeSpecError) -> SchemaLoadError {
        SchemaLoadError::InvalidTypeSpec {
            file: self.file.to_string(),
            class_name: self.class_name.to_string(),
            field: self.field.to_string(),
            source,
        }
    }

    fn parse(&self, text: &str) -> Result<TypeSpec, SchemaLoadError> {
        TypeSpec::parse(text)
            .map(|spec| resolve_enums(spec, self.enums))
            .map_err(|source| self.invalid(source))
    }

    fn field_type(&self, el: &XmlElement) -> Result<TypeSpec, SchemaLoadError> {
        let ty = self.require(el, "type")?;

        if eq_ignore_case(ty, "Map") {
            let key = self.require(el, "key")?;
            let value = self.require(el, "value")?;
            return Ok(TypeSpec::Map(
                Box::new(self.parse(key)?),
                Box::new(self.parse(value)?),
            ));
        }
        if eq_ignore_case(ty, "DynamicArray") {
            return Ok(TypeSpec::DynamicArray(Box::new(self.element_type(el)?)));
        }
        if eq_ignore_case(ty, "StaticArray") {
            let element = self.element_type(el)?;
            let count = ["count", "size", "n"]
                .into_iter()
                .find_map(|attr| el.non_empty_attribute(attr));
            let Some(count) = count else {
                return Err(self.missing("count"));
            };
            let n = count.parse::<usize>().map_err(|_| {
                self.invalid(TypeSpecError::InvalidCount {
                    spec: format!("StaticArray<{element}, {count}>"),
                    count: count.to_string(),
                })
            })?;
            return Ok(TypeSpec::StaticArray(Box::new(element), n));
        }
        if eq_ignore_case(ty, "AssetReference") {
            let target = self.require(el, "target")?;
            return Ok(TypeSpec::AssetReference(target.to_string()));
        }
        self.parse(ty)
    }

    fn element_type(&self, el: &XmlElement) -> Result<TypeSpec, SchemaLoadError> {
        let element = self.require(el, "element")?;
        if eq_ignore_case(element, "AssetReference") {
            let target = self.require(el, "target")?;
            return Ok(TypeSpec::AssetReference(target.to_string()));
        }
        self.parse(element)
    }
}

/// Rewrite bare identifiers naming a file-local enum to `Enum<Name>`.
fn resolve_enums(spec: TypeSpec, enums: &IndexMap<String, EnumDef>) -> TypeSpec {
    match spec {
        TypeSpec::ObjectRef(name) if enums.contains_key(&name) => TypeSpec::Enum(name),
        TypeSpec::DynamicArray(elem) => TypeSpec::DynamicArray(Box::new(resolve_enums(*elem, enums))),
        TypeSpec::StaticArray(elem, n) => {
            TypeSpec::StaticArray(Box::new(resolve_enums(*elem, enums)), n)
        }
        TypeSpec::Map(key, value) => TypeSpec::Map(
            Box::new(resolve_enums(*key, enums)),
            Box::new(resolve_enums(*value, enums)),
        ),
        other => other,
    }
}

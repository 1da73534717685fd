//! On-disk element and attribute names shared by the decoder and encoder.

use rsd_core::{ScalarKind, TypeSpec, VectorWidth};
use rsd_schema::SchemaRegistry;

/// Root element name written for every asset document.
pub const ROOT_TAG: &str = "asset";

/// Element name of one array element.
pub const ITEM_TAG: &str = "item";

/// The three fixed entry shapes of a `Map<String, V>` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapShape {
    /// `<vec4 name=".." x=".." y=".." z=".." w=".."/>`
    Vector4,
    /// `<float name=".." value=".."/>`
    Float,
    /// `<texture name=".." file=".."/>`
    Text,
}

impl MapShape {
    /// Shape for a map of `key` to `value`, or `None` when the map kind
    /// has no on-disk form.
    pub fn for_map(key: &TypeSpec, value: &TypeSpec) -> Option<Self> {
        if *key != TypeSpec::Scalar(ScalarKind::String) {
            return None;
        }
        match value {
            TypeSpec::Vector(VectorWidth::Four) => Some(Self::Vector4),
            TypeSpec::Scalar(ScalarKind::Float) => Some(Self::Float),
            v if v.is_string_like() => Some(Self::Text),
            _ => None,
        }
    }

    /// Entry element name.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Vector4 => "vec4",
            Self::Float => "float",
            Self::Text => "texture",
        }
    }
}

/// Why arrays of `element` have no on-disk form, or `None` when they do.
pub fn unsupported_element(element: &TypeSpec, registry: &SchemaRegistry) -> Option<String> {
    match element {
        TypeSpec::DynamicArray(_) | TypeSpec::StaticArray(..) => {
            Some(format!("nested arrays ({element}) are not supported"))
        }
        TypeSpec::Map(..) => Some(format!("arrays of maps ({element}) are not supported")),
        TypeSpec::ObjectRef(class) if registry.try_get_by_class_name(class).is_none() => {
            Some(format!("unknown array element type '{class}'"))
        }
        _ => None,
    }
}

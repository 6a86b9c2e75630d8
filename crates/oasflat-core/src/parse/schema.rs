use std::mem;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// A Swagger 2.0 schema node, classified into exactly one shape.
///
/// The wire format is a single JSON object whose keys decide the shape
/// (`$ref`, `allOf`, `type`, `items`, `properties`, `additionalProperties`).
/// Traversals match on the variant instead of probing keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSchema", into = "RawSchema")]
pub enum Schema {
    Object(ObjectSchema),
    Array(ArraySchema),
    Map(MapSchema),
    Ref(RefSchema),
    Composed(ComposedSchema),
    Primitive(PrimitiveSchema),
}

impl Default for Schema {
    fn default() -> Self {
        Schema::Object(ObjectSchema::default())
    }
}

impl Schema {
    /// A `$ref` to the named definition.
    pub fn reference(target: impl Into<String>) -> Self {
        Schema::Ref(RefSchema::new(target))
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_ref_target(&self) -> Option<&str> {
        match self {
            Schema::Ref(r) => Some(&r.target),
            _ => None,
        }
    }

    /// True when this node is, or directly wraps, an object with declared
    /// properties: an inline object, an array of one, or a map of one.
    pub fn has_inline_model(&self) -> bool {
        match self {
            Schema::Object(o) => o.is_inline_model(),
            Schema::Array(a) => a.items.as_deref().is_some_and(Schema::is_inline_object),
            Schema::Map(m) => m.additional_properties.is_inline_object(),
            _ => false,
        }
    }

    fn is_inline_object(&self) -> bool {
        matches!(self, Schema::Object(o) if o.is_inline_model())
    }

    pub fn extensions(&self) -> &IndexMap<String, Value> {
        match self {
            Schema::Object(o) => &o.extensions,
            Schema::Array(a) => &a.extensions,
            Schema::Map(m) => &m.extensions,
            Schema::Ref(r) => &r.extensions,
            Schema::Composed(c) => &c.extensions,
            Schema::Primitive(p) => &p.extensions,
        }
    }
}

/// XML serialization hints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Xml {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrapped: Option<bool>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

/// An object with named properties.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default_value: Option<Value>,
    /// Programmatic name of the node. Not part of the wire format.
    pub name: Option<String>,
    pub xml: Option<Xml>,
    pub properties: IndexMap<String, Schema>,
    pub required: Vec<String>,
    pub additional_properties: Option<AdditionalProperties>,
    pub discriminator: Option<String>,
    pub read_only: Option<bool>,
    pub extensions: IndexMap<String, Value>,
}

impl ObjectSchema {
    /// An object declaring at least one property, i.e. something worth naming.
    pub fn is_inline_model(&self) -> bool {
        !self.properties.is_empty()
    }
}

/// `type: array`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ArraySchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default_value: Option<Value>,
    pub items: Option<Box<Schema>>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
    pub unique_items: Option<bool>,
    pub xml: Option<Xml>,
    pub read_only: Option<bool>,
    pub extensions: IndexMap<String, Value>,
}

/// An object with no declared properties whose values all share one schema.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MapSchema {
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default_value: Option<Value>,
    pub additional_properties: Box<Schema>,
    pub read_only: Option<bool>,
    pub extensions: IndexMap<String, Value>,
}

/// A pointer to a named definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefSchema {
    /// Definition name for local refs, the raw pointer otherwise.
    pub target: String,
    pub extensions: IndexMap<String, Value>,
}

impl RefSchema {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            extensions: IndexMap::new(),
        }
    }

    /// The JSON pointer written to `$ref`.
    pub fn ref_path(&self) -> String {
        if self.target.contains('/') || self.target.contains('#') {
            self.target.clone()
        } else {
            format!("{DEFINITIONS_PREFIX}{}", self.target)
        }
    }

    fn from_ref_path(ref_path: String, extensions: IndexMap<String, Value>) -> Self {
        let target = match ref_path.strip_prefix(DEFINITIONS_PREFIX) {
            Some(name) => name.to_string(),
            None => ref_path,
        };
        Self { target, extensions }
    }
}

/// `allOf` composition: inherited parents plus the locally declared child.
///
/// `properties` and `required` written next to `allOf` are kept apart from
/// the child.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComposedSchema {
    pub schema_type: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub parents: Vec<Schema>,
    pub child: Option<Box<Schema>>,
    pub properties: IndexMap<String, Schema>,
    pub required: Vec<String>,
    pub discriminator: Option<String>,
    pub extensions: IndexMap<String, Value>,
}

/// Scalars and untyped leaves. Never flattened.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PrimitiveSchema {
    pub schema_type: Option<String>,
    pub format: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub default_value: Option<Value>,
    pub enum_values: Vec<Value>,
    pub xml: Option<Xml>,
    pub read_only: Option<bool>,
    pub extensions: IndexMap<String, Value>,
}

/// Wire representation shared by every variant. Keys the model does not
/// name (vendor extensions, validation keywords) land in `extensions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    ref_path: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    schema_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(rename = "default", skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    example: Option<Value>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    enum_values: Vec<Value>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    properties: IndexMap<String, Schema>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    additional_properties: Option<AdditionalProperties>,

    #[serde(skip_serializing_if = "Option::is_none")]
    items: Option<Box<Schema>>,

    #[serde(rename = "minItems", skip_serializing_if = "Option::is_none")]
    min_items: Option<u64>,
    #[serde(rename = "maxItems", skip_serializing_if = "Option::is_none")]
    max_items: Option<u64>,
    #[serde(rename = "uniqueItems", skip_serializing_if = "Option::is_none")]
    unique_items: Option<bool>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    all_of: Vec<Schema>,

    #[serde(skip_serializing_if = "Option::is_none")]
    discriminator: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    xml: Option<Xml>,

    #[serde(rename = "readOnly", skip_serializing_if = "Option::is_none")]
    read_only: Option<bool>,

    #[serde(flatten)]
    extensions: IndexMap<String, Value>,
}

impl RawSchema {
    /// Extensions plus every named key the chosen variant did not move out,
    /// so no wire key is lost on conversion.
    fn into_extensions(mut self) -> IndexMap<String, Value> {
        let mut extensions = mem::take(&mut self.extensions);
        if let Ok(Value::Object(leftover)) = serde_json::to_value(&self) {
            extensions.extend(leftover);
        }
        extensions
    }
}

impl From<RawSchema> for Schema {
    fn from(mut raw: RawSchema) -> Self {
        if let Some(ref_path) = raw.ref_path.take() {
            return Schema::Ref(RefSchema::from_ref_path(ref_path, raw.into_extensions()));
        }

        if !raw.all_of.is_empty() {
            let mut parents = mem::take(&mut raw.all_of);
            let child = parents
                .iter()
                .rposition(|s| matches!(s, Schema::Object(_)))
                .map(|i| Box::new(parents.remove(i)));
            return Schema::Composed(ComposedSchema {
                schema_type: raw.schema_type.take(),
                title: raw.title.take(),
                description: raw.description.take(),
                example: raw.example.take(),
                parents,
                child,
                properties: mem::take(&mut raw.properties),
                required: mem::take(&mut raw.required),
                discriminator: raw.discriminator.take(),
                extensions: raw.into_extensions(),
            });
        }

        let is_array = match raw.schema_type.as_deref() {
            Some("array") => true,
            None => raw.items.is_some(),
            Some(_) => false,
        };
        if is_array {
            raw.schema_type = None;
            return Schema::Array(ArraySchema {
                title: raw.title.take(),
                description: raw.description.take(),
                example: raw.example.take(),
                default_value: raw.default_value.take(),
                items: raw.items.take(),
                min_items: raw.min_items.take(),
                max_items: raw.max_items.take(),
                unique_items: raw.unique_items.take(),
                xml: raw.xml.take(),
                read_only: raw.read_only.take(),
                extensions: raw.into_extensions(),
            });
        }

        let is_object = match raw.schema_type.as_deref() {
            Some("object") => true,
            None => !raw.properties.is_empty() || raw.additional_properties.is_some(),
            Some(_) => false,
        };
        if !is_object {
            return Schema::Primitive(PrimitiveSchema {
                schema_type: raw.schema_type.take(),
                format: raw.format.take(),
                title: raw.title.take(),
                description: raw.description.take(),
                example: raw.example.take(),
                default_value: raw.default_value.take(),
                enum_values: mem::take(&mut raw.enum_values),
                xml: raw.xml.take(),
                read_only: raw.read_only.take(),
                extensions: raw.into_extensions(),
            });
        }

        raw.schema_type = None;
        match raw.additional_properties.take() {
            Some(AdditionalProperties::Schema(value)) if raw.properties.is_empty() => {
                Schema::Map(MapSchema {
                    title: raw.title.take(),
                    description: raw.description.take(),
                    example: raw.example.take(),
                    default_value: raw.default_value.take(),
                    additional_properties: value,
                    read_only: raw.read_only.take(),
                    extensions: raw.into_extensions(),
                })
            }
            additional_properties => Schema::Object(ObjectSchema {
                title: raw.title.take(),
                description: raw.description.take(),
                example: raw.example.take(),
                default_value: raw.default_value.take(),
                name: None,
                xml: raw.xml.take(),
                properties: mem::take(&mut raw.properties),
                required: mem::take(&mut raw.required),
                additional_properties,
                discriminator: raw.discriminator.take(),
                read_only: raw.read_only.take(),
                extensions: raw.into_extensions(),
            }),
        }
    }
}

impl From<Schema> for RawSchema {
    fn from(schema: Schema) -> Self {
        match schema {
            Schema::Object(o) => RawSchema {
                schema_type: Some("object".to_string()),
                title: o.title,
                description: o.description,
                example: o.example,
                default_value: o.default_value,
                xml: o.xml,
                properties: o.properties,
                required: o.required,
                additional_properties: o.additional_properties,
                discriminator: o.discriminator,
                read_only: o.read_only,
                extensions: o.extensions,
                ..Default::default()
            },
            Schema::Array(a) => RawSchema {
                schema_type: Some("array".to_string()),
                title: a.title,
                description: a.description,
                example: a.example,
                default_value: a.default_value,
                items: a.items,
                min_items: a.min_items,
                max_items: a.max_items,
                unique_items: a.unique_items,
                xml: a.xml,
                read_only: a.read_only,
                extensions: a.extensions,
                ..Default::default()
            },
            Schema::Map(m) => RawSchema {
                schema_type: Some("object".to_string()),
                title: m.title,
                description: m.description,
                example: m.example,
                default_value: m.default_value,
                additional_properties: Some(AdditionalProperties::Schema(
                    m.additional_properties,
                )),
                read_only: m.read_only,
                extensions: m.extensions,
                ..Default::default()
            },
            Schema::Ref(r) => RawSchema {
                ref_path: Some(r.ref_path()),
                extensions: r.extensions,
                ..Default::default()
            },
            Schema::Composed(c) => {
                let mut all_of = c.parents;
                all_of.extend(c.child.map(|child| *child));
                RawSchema {
                    schema_type: c.schema_type,
                    title: c.title,
                    description: c.description,
                    example: c.example,
                    properties: c.properties,
                    required: c.required,
                    all_of,
                    discriminator: c.discriminator,
                    extensions: c.extensions,
                    ..Default::default()
                }
            }
            Schema::Primitive(p) => RawSchema {
                schema_type: p.schema_type,
                format: p.format,
                title: p.title,
                description: p.description,
                example: p.example,
                default_value: p.default_value,
                enum_values: p.enum_values,
                xml: p.xml,
                read_only: p.read_only,
                extensions: p.extensions,
                ..Default::default()
            },
        }
    }
}

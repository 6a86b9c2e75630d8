use std::collections::HashMap;
use std::mem;

use indexmap::IndexMap;
use log::{debug, info, trace, warn};
use serde_json::Value;

use crate::config::FlattenConfig;
use crate::parse::operation::{HttpMethod, Operation};
use crate::parse::parameter::ParameterOrRef;
use crate::parse::response::ResponseOrRef;
use crate::parse::schema::{
    AdditionalProperties, ArraySchema, MapSchema, ObjectSchema, RefSchema, Schema,
};
use crate::parse::spec::SwaggerSpec;

use super::name_normalizer::{route_to_name, sanitize_model_name};
use super::signature::ModelSignature;

/// Flatten a document with default options.
pub fn flatten(spec: &mut SwaggerSpec) {
    InlineModelResolver::new().flatten(spec);
}

/// Hoists inline object schemas into named `definitions` and replaces each
/// use-site with a `$ref`.
///
/// Sites visited, in order: body parameters and responses of every operation,
/// then the properties of every definition. Nested objects are named before
/// the object containing them, so their names derive from the outer context
/// (`body` → `body_address`). An object that has properties and also an
/// `additionalProperties` schema gets its value model named `{context}_inner`.
/// Structurally identical models generated during one pass share a single
/// definition unless `skip_matches` is set.
#[derive(Debug, Clone, Default)]
pub struct InlineModelResolver {
    skip_matches: bool,
}

impl InlineModelResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &FlattenConfig) -> Self {
        Self {
            skip_matches: config.skip_matches,
        }
    }

    /// Disable reuse of structurally identical generated models.
    pub fn skip_matches(mut self, skip_matches: bool) -> Self {
        self.skip_matches = skip_matches;
        self
    }

    pub fn is_skip_matches(&self) -> bool {
        self.skip_matches
    }

    /// Start a session registering models into `definitions`. Each session
    /// owns its own signature cache.
    pub fn session<'a>(&self, definitions: &'a mut IndexMap<String, Schema>) -> FlattenSession<'a> {
        FlattenSession {
            definitions,
            signatures: HashMap::new(),
            skip_matches: self.skip_matches,
        }
    }

    /// Flatten `spec` in place. Running it again on the result changes nothing.
    pub fn flatten(&self, spec: &mut SwaggerSpec) {
        let SwaggerSpec {
            paths, definitions, ..
        } = spec;
        let before = definitions.len();
        let mut session = self.session(definitions);

        for (path, item) in paths.iter_mut() {
            for (method, operation) in item.operations_mut() {
                session.flatten_operation(path, method, operation);
            }
        }
        session.flatten_definitions();

        info!(
            "flattened inline schemas: {} definitions added",
            session.definitions.len() - before
        );
    }
}

/// One flattening pass over a definition table.
pub struct FlattenSession<'a> {
    definitions: &'a mut IndexMap<String, Schema>,
    signatures: HashMap<ModelSignature, String>,
    skip_matches: bool,
}

impl FlattenSession<'_> {
    fn flatten_operation(&mut self, path: &str, method: HttpMethod, operation: &mut Operation) {
        for parameter in &mut operation.parameters {
            let ParameterOrRef::Parameter(parameter) = parameter else {
                continue;
            };
            if !parameter.is_body() {
                continue;
            }
            if let Some(schema) = parameter.schema.as_mut() {
                self.flatten_site(schema, &parameter.name, false);
            }
        }

        let operation_name = match operation.operation_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => route_to_name(method, path),
        };
        for (code, response) in operation.responses.iter_mut() {
            let ResponseOrRef::Response(response) = response else {
                continue;
            };
            if let Some(schema) = response.schema.as_mut() {
                self.flatten_site(schema, &format!("{operation_name}_{code}"), true);
            }
        }
    }

    /// Definitions added while this runs are already flat, so only the names
    /// present on entry are visited.
    fn flatten_definitions(&mut self) {
        let names: Vec<String> = self.definitions.keys().cloned().collect();
        for name in names {
            // The slot keeps a placeholder so the name stays taken meanwhile.
            let Some(slot) = self.definitions.get_mut(&name) else {
                continue;
            };
            let mut schema = mem::take(slot);
            self.flatten_definition(&name, &mut schema);
            if let Some(slot) = self.definitions.get_mut(&name) {
                *slot = schema;
            }
        }
    }

    fn flatten_definition(&mut self, name: &str, schema: &mut Schema) {
        match schema {
            Schema::Object(object) => {
                self.flatten_properties(&mut object.properties, name);
                self.flatten_additional_properties(&mut object.additional_properties, name);
            }
            Schema::Array(array) => {
                if let Some(items) = array.items.as_deref_mut() {
                    self.hoist_inline_object(items, &format!("{name}_inner"), false);
                }
            }
            Schema::Map(map) => {
                self.hoist_inline_object(&mut map.additional_properties, &format!("{name}_inner"), false);
            }
            Schema::Composed(composed) => {
                self.flatten_properties(&mut composed.properties, name);
                if let Some(Schema::Object(child)) = composed.child.as_deref_mut() {
                    self.flatten_properties(&mut child.properties, name);
                }
            }
            Schema::Ref(_) | Schema::Primitive(_) => {}
        }
    }

    /// Flatten one use-site: an inline object, or the element schema of an
    /// array or map. `keep_extensions` copies the replaced node's vendor
    /// extensions onto the new `$ref`.
    fn flatten_site(&mut self, schema: &mut Schema, fallback: &str, keep_extensions: bool) {
        match schema {
            Schema::Array(array) => {
                if let Some(items) = array.items.as_deref_mut() {
                    self.hoist_inline_object(items, fallback, keep_extensions);
                }
            }
            Schema::Map(map) => {
                self.hoist_inline_object(&mut map.additional_properties, fallback, keep_extensions);
            }
            _ => {
                self.hoist_inline_object(schema, fallback, keep_extensions);
            }
        }
    }

    /// Hoist the value schema of an object that also declares properties.
    fn flatten_additional_properties(
        &mut self,
        additional_properties: &mut Option<AdditionalProperties>,
        context: &str,
    ) {
        if let Some(AdditionalProperties::Schema(value)) = additional_properties {
            self.hoist_inline_object(value, &format!("{context}_inner"), false);
        }
    }

    /// Replace `schema` with a `$ref` if it is an object with properties.
    /// Returns the definition name it now points at.
    fn hoist_inline_object(
        &mut self,
        schema: &mut Schema,
        fallback: &str,
        keep_extensions: bool,
    ) -> Option<String> {
        let Schema::Object(object) = schema else {
            trace!("no inline object at {fallback}");
            return None;
        };
        if !object.is_inline_model() {
            return None;
        }

        let object = mem::take(object);
        let extensions: IndexMap<String, Value> = if keep_extensions {
            object
                .extensions
                .iter()
                .filter(|(key, _)| key.starts_with("x-"))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        } else {
            IndexMap::new()
        };

        let name = self.resolve_model_name(object.title.as_deref(), fallback);
        let model = self.model_from_object(object, &name);
        let name = self.register(name, model);

        *schema = Schema::Ref(RefSchema {
            target: name.clone(),
            extensions,
        });
        Some(name)
    }

    /// Reuse a matching generated model or add `model` under `name`, taking a
    /// fresh suffix if nested registrations claimed `name` in the meantime.
    fn register(&mut self, name: String, model: Schema) -> String {
        let signature = signature_of(&model);
        if let Some(signature) = &signature {
            if let Some(existing) = self.match_signature(signature) {
                debug!(
                    "reusing definition {existing} for inline model {name} (signature {})",
                    signature.to_hex()
                );
                return existing;
            }
        }
        let name = self.unique_name(&name);
        if let Some(signature) = signature {
            self.signatures.insert(signature, name.clone());
        }
        debug!("registered inline model as definition {name}");
        self.definitions.insert(name.clone(), model);
        name
    }

    /// Hoist inline models out of `properties`, naming each after
    /// `{context}_{key}` unless it has a title. Rewrites are collected first
    /// and written back once the walk is done.
    pub fn flatten_properties(&mut self, properties: &mut IndexMap<String, Schema>, context: &str) {
        let mut staged: IndexMap<String, Schema> = IndexMap::new();
        for (key, property) in properties.iter() {
            if !property.has_inline_model() {
                continue;
            }
            let mut rewritten = property.clone();
            self.flatten_site(&mut rewritten, &format!("{context}_{key}"), false);
            staged.insert(key.clone(), rewritten);
        }

        for (key, property) in staged {
            properties.insert(key, property);
        }
    }

    /// Title when present and non-empty, otherwise `fallback`; sanitized and
    /// made unique against the definition table.
    pub fn resolve_model_name(&self, title: Option<&str>, fallback: &str) -> String {
        match title {
            Some(title) if !title.is_empty() => self.unique_name(title),
            _ => self.unique_name(fallback),
        }
    }

    /// First of `key`, `key_1`, `key_2`, … not yet defined.
    ///
    /// The search has no upper bound.
    pub fn unique_name(&self, key: &str) -> String {
        let key = sanitize_model_name(key);
        if !self.definitions.contains_key(&key) {
            return key;
        }
        let mut count = 1usize;
        loop {
            let name = format!("{key}_{count}");
            if !self.definitions.contains_key(&name) {
                return name;
            }
            count += 1;
        }
    }

    /// Name of a previously generated model with identical content.
    pub fn match_generated(&self, model: &Schema) -> Option<String> {
        self.match_signature(&signature_of(model)?)
    }

    fn match_signature(&self, signature: &ModelSignature) -> Option<String> {
        if self.skip_matches {
            return None;
        }
        self.signatures.get(signature).cloned()
    }

    pub fn add_generated(&mut self, name: &str, model: &Schema) {
        if let Some(signature) = signature_of(model) {
            self.signatures.insert(signature, name.to_string());
        }
    }

    /// Definition body for an inline object: description, stringified
    /// example, name, xml, required and the flattened properties and
    /// `additionalProperties`, with nested models named under `context`.
    pub fn model_from_object(&mut self, object: ObjectSchema, context: &str) -> Schema {
        let ObjectSchema {
            description,
            example,
            name,
            xml,
            mut properties,
            required,
            mut additional_properties,
            ..
        } = object;

        self.flatten_properties(&mut properties, context);
        self.flatten_additional_properties(&mut additional_properties, context);

        Schema::Object(ObjectSchema {
            description,
            example: stringify_example(example),
            name,
            xml,
            properties,
            required,
            additional_properties,
            ..Default::default()
        })
    }

    /// Array model wrapping the items of `array`, if they are an inline object.
    pub fn model_from_array(&self, array: &ArraySchema) -> Option<Schema> {
        match array.items.as_deref() {
            Some(Schema::Object(_)) => Some(Schema::Array(ArraySchema {
                description: array.description.clone(),
                example: stringify_example(array.example.clone()),
                items: array.items.clone(),
                ..Default::default()
            })),
            _ => None,
        }
    }

    /// Array model wrapping the value schema of `map`.
    pub fn model_from_map(&self, map: &MapSchema) -> Schema {
        Schema::Array(ArraySchema {
            description: map.description.clone(),
            example: stringify_example(map.example.clone()),
            items: Some(map.additional_properties.clone()),
            ..Default::default()
        })
    }
}

fn signature_of(model: &Schema) -> Option<ModelSignature> {
    match ModelSignature::of(model) {
        Ok(signature) => Some(signature),
        Err(err) => {
            warn!("cannot compute model signature, skipping deduplication: {err}");
            None
        }
    }
}

fn stringify_example(example: Option<Value>) -> Option<Value> {
    example.map(|value| match value {
        Value::String(_) => value,
        other => Value::String(other.to_string()),
    })
}

use oasflat_core::config::FlattenConfig;
use oasflat_core::parse;
use oasflat_core::parse::parameter::ParameterOrRef;
use oasflat_core::parse::response::ResponseOrRef;
use oasflat_core::parse::schema::Schema;
use oasflat_core::parse::spec::SwaggerSpec;
use oasflat_core::transform::{self, InlineModelResolver};

const INLINE_STORE: &str = include_str!("fixtures/inline-store.yaml");

fn flattened() -> SwaggerSpec {
    let mut spec = parse::from_yaml(INLINE_STORE).expect("should parse inline-store.yaml");
    transform::flatten(&mut spec);
    spec
}

fn body_schema<'a>(spec: &'a SwaggerSpec, path: &str) -> &'a Schema {
    let op = spec.paths[path].post.as_ref().expect("should have POST");
    op.parameters
        .iter()
        .find_map(|p| match p {
            ParameterOrRef::Parameter(p) if p.is_body() => p.schema.as_ref(),
            _ => None,
        })
        .expect("should have a body parameter")
}

fn response_schema<'a>(spec: &'a SwaggerSpec, path: &str, code: &str) -> &'a Schema {
    let op = spec.paths[path].get.as_ref().expect("should have GET");
    match &op.responses[code] {
        ResponseOrRef::Response(r) => r.schema.as_ref().expect("response should have a schema"),
        _ => panic!("expected inline response"),
    }
}

fn object_keys(schema: &Schema) -> Vec<&str> {
    schema
        .as_object()
        .expect("expected object schema")
        .properties
        .keys()
        .map(String::as_str)
        .collect()
}

/// Every site the flattener covers, checked for leftover inline models.
fn assert_no_inline_models(spec: &SwaggerSpec) {
    for (path, item) in &spec.paths {
        for (method, op) in item.operations() {
            for param in &op.parameters {
                if let ParameterOrRef::Parameter(p) = param {
                    if let Some(schema) = &p.schema {
                        assert!(
                            !schema.has_inline_model(),
                            "{method} {path}: body {} still inline",
                            p.name
                        );
                    }
                }
            }
            for (code, response) in &op.responses {
                if let ResponseOrRef::Response(r) = response {
                    if let Some(schema) = &r.schema {
                        assert!(
                            !schema.has_inline_model(),
                            "{method} {path}: response {code} still inline"
                        );
                    }
                }
            }
        }
    }

    for (name, definition) in &spec.definitions {
        let properties = match definition {
            Schema::Object(o) => Some(&o.properties),
            Schema::Composed(c) => {
                for (key, property) in &c.properties {
                    assert!(
                        !property.has_inline_model(),
                        "definition {name}: allOf sibling {key} still inline"
                    );
                }
                c.child.as_deref().and_then(Schema::as_object).map(|o| &o.properties)
            }
            Schema::Array(_) | Schema::Map(_) => {
                assert!(
                    !definition.has_inline_model(),
                    "definition {name}: inline element schema"
                );
                None
            }
            _ => None,
        };
        for (key, property) in properties.into_iter().flatten() {
            assert!(
                !property.has_inline_model(),
                "definition {name}: property {key} still inline"
            );
        }
    }
}

#[test]
fn body_parameter_and_nested_property_are_hoisted() {
    let spec = flattened();

    assert_eq!(body_schema(&spec, "/users").as_ref_target(), Some("body"));
    assert_eq!(object_keys(&spec.definitions["body"]), ["id", "address"]);
    let body = spec.definitions["body"].as_object().unwrap();
    assert_eq!(body.properties["address"].as_ref_target(), Some("body_address"));
    assert_eq!(object_keys(&spec.definitions["body_address"]), ["street"]);
}

#[test]
fn response_is_named_after_operation_and_code() {
    let spec = flattened();

    let schema = response_schema(&spec, "/users/{id}", "200");
    assert_eq!(schema.as_ref_target(), Some("getUser_200"));
    assert_eq!(object_keys(&spec.definitions["getUser_200"]), ["name"]);
}

#[test]
fn response_ref_keeps_vendor_extensions() {
    let spec = flattened();

    let schema = response_schema(&spec, "/users/{id}", "200");
    assert_eq!(schema.extensions()["x-cache-ttl"], serde_json::json!(60));

    let Schema::Array(pets) = response_schema(&spec, "/pets", "200") else {
        panic!("expected array response")
    };
    let items = pets.items.as_deref().unwrap();
    assert_eq!(items.as_ref_target(), Some("listPets_200"));
    assert_eq!(items.extensions()["x-item-kind"], serde_json::json!("pet"));
}

#[test]
fn map_response_without_operation_id_uses_route_name() {
    let spec = flattened();

    let Schema::Map(stock) = response_schema(&spec, "/inventory", "200") else {
        panic!("expected map response")
    };
    assert_eq!(
        stock.additional_properties.as_ref_target(),
        Some("listInventory_200")
    );
    assert_eq!(object_keys(&spec.definitions["listInventory_200"]), ["count"]);
}

#[test]
fn identical_bodies_share_one_definition() {
    let spec = flattened();

    assert_eq!(body_schema(&spec, "/points").as_ref_target(), Some("point"));
    assert_eq!(body_schema(&spec, "/vectors").as_ref_target(), Some("point"));
    assert!(!spec.definitions.contains_key("vector"));
}

#[test]
fn skip_matches_keeps_one_definition_per_site() {
    let mut spec = parse::from_yaml(INLINE_STORE).unwrap();
    InlineModelResolver::new().skip_matches(true).flatten(&mut spec);

    assert_eq!(body_schema(&spec, "/points").as_ref_target(), Some("point"));
    assert_eq!(body_schema(&spec, "/vectors").as_ref_target(), Some("vector"));

    let Schema::Array(list) = &spec.definitions["PetList"] else {
        panic!("expected array definition")
    };
    assert_eq!(
        list.items.as_deref().and_then(Schema::as_ref_target),
        Some("PetList_inner")
    );
}

#[test]
fn skip_matches_from_config() {
    let config: FlattenConfig = serde_yaml_ng::from_str("skip_matches: true").unwrap();
    let resolver = InlineModelResolver::with_config(&config);
    assert!(resolver.is_skip_matches());

    let mut spec = parse::from_yaml(INLINE_STORE).unwrap();
    resolver.flatten(&mut spec);
    assert!(spec.definitions.contains_key("vector"));
}

#[test]
fn definition_properties_are_flattened_in_place() {
    let spec = flattened();

    let pet = spec.definitions["Pet"].as_object().unwrap();
    assert_eq!(pet.properties["owner"].as_ref_target(), Some("Pet_owner"));
    assert_eq!(pet.required, ["name"]);

    let order = spec.definitions["Order"].as_object().unwrap();
    let Schema::Array(lines) = &order.properties["lines"] else {
        panic!("expected array property")
    };
    assert_eq!(
        lines.items.as_deref().and_then(Schema::as_ref_target),
        Some("Order_lines")
    );
    assert_eq!(object_keys(&spec.definitions["Order_lines"]), ["sku", "quantity"]);
}

#[test]
fn titled_map_value_is_named_after_title() {
    let spec = flattened();

    let order = spec.definitions["Order"].as_object().unwrap();
    let Schema::Map(metadata) = &order.properties["metadata"] else {
        panic!("expected map property")
    };
    assert_eq!(metadata.additional_properties.as_ref_target(), Some("Annotation"));
    assert!(!spec.definitions.contains_key("Order_metadata"));
}

#[test]
fn composed_child_properties_are_flattened() {
    let spec = flattened();

    let Schema::Composed(cat) = &spec.definitions["Cat"] else {
        panic!("expected composed definition")
    };
    assert_eq!(cat.parents[0].as_ref_target(), Some("Pet"));
    let child = cat.child.as_deref().and_then(Schema::as_object).unwrap();
    assert_eq!(child.properties["whiskers"].as_ref_target(), Some("Cat_whiskers"));
}

#[test]
fn array_definition_reuses_model_generated_for_response() {
    let spec = flattened();

    let Schema::Array(list) = &spec.definitions["PetList"] else {
        panic!("expected array definition")
    };
    assert_eq!(
        list.items.as_deref().and_then(Schema::as_ref_target),
        Some("listPets_200")
    );
    assert!(!spec.definitions.contains_key("PetList_inner"));
}

#[test]
fn definitions_are_added_in_traversal_order() {
    let spec = flattened();

    let names: Vec<&str> = spec.definitions.keys().map(String::as_str).collect();
    insta::assert_yaml_snapshot!(names, @r"
    - Pet
    - Order
    - Cat
    - PetList
    - body_address
    - body
    - getUser_200
    - point
    - listPets_200
    - listInventory_200
    - Pet_owner
    - Order_lines
    - Annotation
    - Cat_whiskers
    ");
}

#[test]
fn no_inline_models_remain() {
    let spec = flattened();
    assert_no_inline_models(&spec);
}

#[test]
fn definition_names_use_allowed_characters() {
    let spec = flattened();
    for name in spec.definitions.keys() {
        assert!(
            name.chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | ' ')),
            "illegal definition name {name:?}"
        );
    }
}

#[test]
fn second_flatten_is_a_no_op() {
    let mut spec = flattened();
    let once = spec.clone();

    transform::flatten(&mut spec);

    assert_eq!(spec, once);
}

#[test]
fn refs_and_skipped_sites_are_untouched() {
    let spec = flattened();

    let op = spec.paths["/pets"].get.as_ref().unwrap();
    assert!(matches!(
        &op.responses["default"],
        ResponseOrRef::Ref { ref_path } if ref_path == "#/responses/Error"
    ));

    let op = spec.paths["/users/{id}"].get.as_ref().unwrap();
    match &op.parameters[0] {
        ParameterOrRef::Parameter(p) => {
            assert!(!p.is_body());
            assert!(p.schema.is_none());
            assert_eq!(p.extensions["type"], serde_json::json!("string"));
        }
        _ => panic!("expected inline parameter"),
    }
}

#[test]
fn flattened_document_survives_yaml_round_trip() {
    let spec = flattened();

    let yaml = parse::to_yaml(&spec).unwrap();
    assert!(yaml.contains("$ref: '#/definitions/body'") || yaml.contains("$ref: \"#/definitions/body\""));

    let reparsed = parse::from_yaml(&yaml).unwrap();
    assert_eq!(reparsed, spec);
}

#[test]
fn flattens_json_input() {
    let json = r#"{
      "swagger": "2.0",
      "info": {"title": "Json", "version": "1"},
      "paths": {
        "/things": {
          "put": {
            "operationId": "putThing",
            "parameters": [{
              "name": "thing",
              "in": "body",
              "schema": {"type": "array", "items": {"type": "object", "properties": {"id": {"type": "string"}}}}
            }],
            "responses": {"200": {"description": "ok"}}
          }
        }
      }
    }"#;
    let mut spec = parse::from_json(json).unwrap();
    assert!(spec.definitions.is_empty());

    transform::flatten(&mut spec);

    let op = spec.paths["/things"].put.as_ref().unwrap();
    let ParameterOrRef::Parameter(thing) = &op.parameters[0] else {
        panic!("expected inline parameter")
    };
    let Some(Schema::Array(items)) = &thing.schema else {
        panic!("expected array body")
    };
    assert_eq!(items.items.as_deref().and_then(Schema::as_ref_target), Some("thing"));
    assert_eq!(object_keys(&spec.definitions["thing"]), ["id"]);

    let out = parse::to_json(&spec).unwrap();
    assert!(out.contains("\"#/definitions/thing\""));
}

#[test]
fn composed_definition_keeps_sibling_properties() {
    let yaml = r##"
swagger: "2.0"
info:
  title: Composed
  version: "1.0"
paths: {}
definitions:
  Base:
    type: object
    properties:
      id: {type: string}
  Cat:
    type: object
    required: [name]
    properties:
      name: {type: string}
      collar:
        type: object
        properties:
          color: {type: string}
    allOf:
      - $ref: "#/definitions/Base"
"##;
    let mut spec = parse::from_yaml(yaml).unwrap();
    transform::flatten(&mut spec);

    let Schema::Composed(cat) = &spec.definitions["Cat"] else {
        panic!("expected composed definition")
    };
    assert_eq!(cat.properties["collar"].as_ref_target(), Some("Cat_collar"));
    assert_eq!(object_keys(&spec.definitions["Cat_collar"]), ["color"]);
    assert_no_inline_models(&spec);

    let out = parse::to_yaml(&spec).unwrap();
    assert!(out.contains("required"));
    assert!(out.contains("name"));
    assert_eq!(parse::from_yaml(&out).unwrap(), spec);
}

use heck::ToPascalCase;

use crate::parse::operation::HttpMethod;

/// Strip every character outside `[A-Za-z0-9_. ]`, leaving a string usable as
/// a definition key and as the tail of a `#/definitions/` pointer.
pub fn sanitize_model_name(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | ' '))
        .collect()
}

/// Derive a camelCase operation name from HTTP method + path, for operations
/// that declare no `operationId`.
///
/// Examples:
/// - `GET /users` → `listUsers`
/// - `POST /users` → `createUsers`
/// - `GET /users/{userId}` → `getUser`
/// - `PUT /users/{userId}` → `updateUser`
/// - `DELETE /users/{userId}` → `deleteUser`
/// - `GET /users/{userId}/messages` → `listUsersMessages`
pub fn route_to_name(method: HttpMethod, path: &str) -> String {
    let mut resource_parts: Vec<&str> = Vec::new();
    let mut ends_with_param = false;

    for seg in path.split('/').filter(|s| !s.is_empty()) {
        if seg.starts_with('{') && seg.ends_with('}') {
            ends_with_param = true;
        } else {
            resource_parts.push(seg);
            ends_with_param = false;
        }
    }

    let prefix = match method {
        HttpMethod::Get if ends_with_param => "get",
        HttpMethod::Get => "list",
        HttpMethod::Post => "create",
        HttpMethod::Put => "update",
        HttpMethod::Delete => "delete",
        HttpMethod::Patch => "patch",
        HttpMethod::Options => "options",
        HttpMethod::Head => "head",
    };

    let last = resource_parts.len().saturating_sub(1);
    let resource: String = resource_parts
        .iter()
        .enumerate()
        .map(|(i, part)| {
            if i == last && ends_with_param {
                singularize(part).to_pascal_case()
            } else {
                part.to_pascal_case()
            }
        })
        .collect();

    format!("{prefix}{resource}")
}

/// Naive singularization: strips trailing 's' if present.
fn singularize(word: &str) -> String {
    if word.ends_with("ies") && word.len() > 3 {
        format!("{}y", &word[..word.len() - 3])
    } else if word.ends_with("ses") || word.ends_with("xes") || word.ends_with("zes") {
        word[..word.len() - 2].to_string()
    } else if word.ends_with('s') && !word.ends_with("ss") && word.len() > 1 {
        word[..word.len() - 1].to_string()
    } else {
        word.to_string()
    }
}

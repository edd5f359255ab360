use schemars::schema::RootSchema;
use schemars::schema_for;

use crate::QuillConfig;

/// JSON schema for `quill.toml`, for editor tooling and CI validation.
#[must_use]
pub fn json_schema() -> RootSchema {
    schema_for!(QuillConfig)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_lists_sections() {
        let value = serde_json::to_value(json_schema()).expect("schema serializes");
        let properties = value["properties"].as_object().expect("properties");
        for section in ["java", "assist", "templates", "nullness", "format", "logging"] {
            assert!(properties.contains_key(section), "missing {section}");
        }
    }
}

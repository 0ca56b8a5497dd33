use serde_json::{Map, Value};

/// Free-form client fields stored on contacts and campaigns.
pub type RecordFields = Map<String, Value>;

/// Keys the server stamps itself; client-supplied values for these are dropped.
pub const RESERVED_KEYS: [&str; 3] = ["id", "userId", "createdAt"];

pub fn strip_reserved(mut fields: RecordFields) -> RecordFields {
    for key in RESERVED_KEYS {
        fields.remove(key);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reserved_keys_are_removed_and_others_kept() {
        let fields = json!({
            "id": "spoofed",
            "userId": "someone-else",
            "createdAt": "yesterday",
            "name": "Jane",
            "tags": ["lead"]
        });
        let Value::Object(map) = fields else {
            unreachable!()
        };

        let stripped = strip_reserved(map);
        assert_eq!(stripped.len(), 2);
        assert_eq!(stripped["name"], "Jane");
        assert_eq!(stripped["tags"], json!(["lead"]));
    }
}

use serde_json::Value;

/// Contact details pulled out of a parent or provider profile.
///
/// Profiles come back either flat or wrapped in a role/data object, so the
/// fields are looked up in both places.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub photo: Option<String>,
}

const WRAPPER_KEYS: [&str; 5] = ["provider", "parent", "profile", "user", "data"];
const PHOTO_KEYS: [&str; 4] = ["photo", "photo_url", "avatar_url", "image_url"];

impl Profile {
    pub fn from_value(value: &Value) -> Self {
        let inner = WRAPPER_KEYS
            .iter()
            .find_map(|k| value.get(*k).filter(|v| v.is_object()));

        let lookup = |keys: &[&str]| -> Option<String> {
            [Some(value), inner]
                .into_iter()
                .flatten()
                .find_map(|obj| keys.iter().find_map(|k| text_field(obj, k)))
        };

        Self {
            name: lookup(&["name"]),
            phone: lookup(&["phone"]),
            photo: lookup(&PHOTO_KEYS),
        }
    }
}

fn text_field(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_profile() {
        let profile = Profile::from_value(&json!({"name": "Kim", "phone": "555-0100"}));
        assert_eq!(profile.phone.as_deref(), Some("555-0100"));
        assert_eq!(profile.name.as_deref(), Some("Kim"));
        assert_eq!(profile.photo, None);
    }

    #[test]
    fn test_wrapped_profile() {
        let profile = Profile::from_value(&json!({
            "provider": {"phone": "555-0199", "avatar_url": "https://cdn.example/a.png"}
        }));
        assert_eq!(profile.phone.as_deref(), Some("555-0199"));
        assert_eq!(profile.photo.as_deref(), Some("https://cdn.example/a.png"));
    }

    #[test]
    fn test_blank_phone_is_missing() {
        let profile = Profile::from_value(&json!({"phone": " ", "parent": {"phone": null}}));
        assert_eq!(profile.phone, None);
    }
}

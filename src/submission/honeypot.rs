use serde_json::Value;

/// Check if the honeypot field is filled. Returns true if spam detected.
pub fn is_spam(data: &Value, honeypot_field: Option<&str>) -> bool {
    let Some(field) = honeypot_field.filter(|f| !f.is_empty()) else {
        return false;
    };

    match data.get(field) {
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn disabled_without_field_name() {
        assert!(!is_spam(&json!({ "website": "x" }), None));
        assert!(!is_spam(&json!({ "website": "x" }), Some("")));
    }

    #[test]
    fn filled_field_is_spam() {
        assert!(is_spam(&json!({ "website": "http://spam" }), Some("website")));
        assert!(is_spam(&json!({ "website": 1 }), Some("website")));
    }

    #[test]
    fn empty_or_absent_field_is_not_spam() {
        assert!(!is_spam(&json!({ "website": "" }), Some("website")));
        assert!(!is_spam(&json!({ "website": null }), Some("website")));
        assert!(!is_spam(&json!({}), Some("website")));
    }
}

use crate::fields::{extract_fields, is_reserved};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reusable document skeleton with `{field}` placeholders.
///
/// `fields` is derived from `content` on every save and is never edited on
/// its own; use [`Template::new`] or [`Template::replace`] to keep the two in
/// step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    pub fields: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Template {
    pub fn new(id: String, name: String, content: String, now: DateTime<Utc>) -> Self {
        let fields = extract_fields(&content);
        Self {
            id,
            name,
            content,
            fields,
            created_at: now,
            updated_at: now,
        }
    }

    /// Full replace of the editable parts, keeping `id` and `created_at`.
    pub fn replace(&mut self, name: String, content: String, now: DateTime<Utc>) {
        self.fields = extract_fields(&content);
        self.name = name;
        self.content = content;
        self.updated_at = now;
    }

    /// Fields the user has to fill in when creating a document.
    pub fn visible_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .map(String::as_str)
            .filter(|f| !is_reserved(f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn new_template_derives_fields() {
        let t = Template::new(
            "t1".into(),
            "Vertrag".into(),
            "<p>{Vorname} {Nachname}</p><p>{DATUM} {UNTERSCHRIFT}</p>".into(),
            at(10),
        );
        assert_eq!(t.fields, vec!["Vorname", "Nachname", "DATUM", "UNTERSCHRIFT"]);
        assert_eq!(t.visible_fields(), vec!["Vorname", "Nachname"]);
        assert_eq!(t.created_at, t.updated_at);
    }

    #[test]
    fn replace_recomputes_fields_and_keeps_identity() {
        let mut t = Template::new("t1".into(), "A".into(), "{X} {Y}".into(), at(10));
        t.replace("B".into(), "{Z}".into(), at(20));

        assert_eq!(t.id, "t1");
        assert_eq!(t.name, "B");
        assert_eq!(t.fields, vec!["Z"]);
        assert_eq!(t.created_at, at(10));
        assert_eq!(t.updated_at, at(20));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let t = Template::new("t1".into(), "A".into(), "{X}".into(), at(0));
        let json = serde_json::to_value(&t).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["fields"], serde_json::json!(["X"]));
    }
}

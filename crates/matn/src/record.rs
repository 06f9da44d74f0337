//! Canonical records for site content.
//!
//! The content API names the same field differently depending on the
//! language and the endpoint (`name`, `ism`, `bo_lim`, ...). Each entity has
//! exactly one normalization function, [`Record::from_api`], that resolves
//! those aliases in a fixed order.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub trait Record: Clone {
    /// Entity name used in error messages and logs.
    const ENTITY: &'static str;

    fn id(&self) -> Option<u64>;
    fn set_id(&mut self, id: u64);
    fn from_api(value: &Value) -> Result<Self>;
    /// Text the repository search matches against.
    fn search_text(&self) -> String;
}

/// First alias holding a non-null, non-blank value.
fn field<'a>(value: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|key| value.get(*key))
        .find(|v| match v {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            _ => true,
        })
}

fn string_field(value: &Value, aliases: &[&str]) -> Option<String> {
    field(value, aliases).and_then(|v| match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn required_string(value: &Value, entity: &str, aliases: &[&str]) -> Result<String> {
    string_field(value, aliases).ok_or_else(|| {
        anyhow!(
            "{} record is missing a required field (tried: {})",
            entity,
            aliases.join(", ")
        )
    })
}

fn id_field(value: &Value) -> Option<u64> {
    match field(value, &["id", "_id"])? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn ensure_object(value: &Value, entity: &str) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(anyhow!("{} record must be a JSON object", entity))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: Option<u64>,
    pub title: String,
    pub body: String,
    pub translit_body: Option<String>,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
}

impl Record for Article {
    const ENTITY: &'static str = "article";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_api(value: &Value) -> Result<Self> {
        ensure_object(value, Self::ENTITY)?;

        let tags = match field(value, &["tags", "teglar"]) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.trim().to_string()),
                    other => string_field(other, &["name", "nomi", "title"]),
                })
                .filter(|tag| !tag.is_empty())
                .collect(),
            _ => Vec::new(),
        };

        let published_at = match string_field(value, &["published_at", "date", "sana"]) {
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(&raw)
                    .map_err(|e| anyhow!("article has an invalid date {:?}: {}", raw, e))?
                    .with_timezone(&Utc),
            ),
            None => None,
        };

        Ok(Self {
            id: id_field(value),
            title: required_string(value, Self::ENTITY, &["title", "sarlavha", "name", "nomi"])?,
            body: string_field(value, &["content", "body", "matn", "text"]).unwrap_or_default(),
            translit_body: string_field(value, &["translit_content", "content_translit", "matn_kiril"]),
            tags,
            published_at,
        })
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.title, self.tags.join(" "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manager {
    pub id: Option<u64>,
    pub name: String,
    pub position: String,
    pub phone: Option<String>,
    pub reception_days: Option<String>,
}

impl Record for Manager {
    const ENTITY: &'static str = "manager";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_api(value: &Value) -> Result<Self> {
        ensure_object(value, Self::ENTITY)?;
        Ok(Self {
            id: id_field(value),
            name: required_string(value, Self::ENTITY, &["name", "ism", "fio", "full_name"])?,
            position: string_field(value, &["position", "lavozim"]).unwrap_or_default(),
            phone: string_field(value, &["phone", "telefon"]),
            reception_days: string_field(value, &["reception_days", "qabul_kunlari"]),
        })
    }

    fn search_text(&self) -> String {
        format!("{} {}", self.name, self.position)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: Option<u64>,
    pub name: String,
    pub head: Option<String>,
    pub description: Option<String>,
}

impl Record for Department {
    const ENTITY: &'static str = "department";

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn set_id(&mut self, id: u64) {
        self.id = Some(id);
    }

    fn from_api(value: &Value) -> Result<Self> {
        ensure_object(value, Self::ENTITY)?;
        Ok(Self {
            id: id_field(value),
            name: required_string(value, Self::ENTITY, &["name", "ism", "bo_lim", "nomi"])?,
            head: string_field(value, &["head", "rahbar"]),
            description: string_field(value, &["description", "tavsif"]),
        })
    }

    fn search_text(&self) -> String {
        self.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_department_name_aliases_in_order() {
        let d = Department::from_api(&json!({ "id": 3, "bo_lim": "Moliya bo'limi" })).unwrap();
        assert_eq!(d.name, "Moliya bo'limi");
        assert_eq!(d.id, Some(3));

        // "name" wins over later aliases; blank values are skipped.
        let d = Department::from_api(&json!({ "name": " ", "ism": "Kadrlar", "bo_lim": "x" })).unwrap();
        assert_eq!(d.name, "Kadrlar");
    }

    #[test]
    fn test_missing_required_field_names_aliases() {
        let err = Manager::from_api(&json!({ "lavozim": "Hokim" })).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("manager"));
        assert!(message.contains("ism"));
    }

    #[test]
    fn test_manager_optional_fields() {
        let m = Manager::from_api(&json!({
            "id": "12",
            "fio": "Aliyev Vali",
            "lavozim": "Hokim o'rinbosari",
            "telefon": 998712000000u64
        }))
        .unwrap();
        assert_eq!(m.id, Some(12));
        assert_eq!(m.name, "Aliyev Vali");
        assert_eq!(m.position, "Hokim o'rinbosari");
        assert_eq!(m.phone.as_deref(), Some("998712000000"));
        assert_eq!(m.reception_days, None);
    }

    #[test]
    fn test_article_normalization() {
        let a = Article::from_api(&json!({
            "sarlavha": "Yangilik",
            "matn": "<p>Matn</p>",
            "matn_kiril": "<p>Матн</p>",
            "teglar": ["tadbir", { "nomi": "hokimlik" }, ""],
            "sana": "2024-03-01T09:30:00+05:00"
        }))
        .unwrap();
        assert_eq!(a.title, "Yangilik");
        assert_eq!(a.body, "<p>Matn</p>");
        assert_eq!(a.translit_body.as_deref(), Some("<p>Матн</p>"));
        assert_eq!(a.tags, vec!["tadbir", "hokimlik"]);
        assert_eq!(
            a.published_at.unwrap().to_rfc3339(),
            "2024-03-01T04:30:00+00:00"
        );
    }

    #[test]
    fn test_article_bad_date_is_error() {
        let err = Article::from_api(&json!({ "title": "x", "date": "yesterday" })).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(Department::from_api(&json!(["name"])).is_err());
    }
}

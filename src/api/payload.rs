use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{rejection::PathRejection, FromRequest, Path, Request},
    http::{header, HeaderMap},
    Form, Json,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::database::models::IdeaDraft;
use crate::error::ApiError;

pub const REQUIRED_FIELDS: &str = "Title, description, and summary are required.";
pub const INVALID_IDEA_ID: &str = "Invalid idea ID";

/// `tags` as clients send it: a comma separated string, a list, or junk
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    Csv(String),
    List(Vec<String>),
    Other(Value),
}

impl TagsInput {
    pub fn normalize(self) -> Vec<String> {
        match self {
            TagsInput::Csv(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            TagsInput::List(tags) => tags,
            TagsInput::Other(_) => Vec::new(),
        }
    }
}

/// Create/update request body. Fields stay loosely typed until [`IdeaPayload::into_draft`].
///
/// Anything else in the body (an `owner` field included) is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct IdeaPayload {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub description: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
    #[serde(default)]
    pub tags: Option<TagsInput>,
}

impl IdeaPayload {
    /// Validate the required text fields and normalize tags
    pub fn into_draft(self) -> Result<IdeaDraft, ApiError> {
        let (Some(title), Some(description), Some(summary)) = (
            required_text(self.title),
            required_text(self.description),
            required_text(self.summary),
        ) else {
            return Err(ApiError::bad_request(REQUIRED_FIELDS));
        };

        Ok(IdeaDraft {
            title,
            description,
            summary,
            tags: self.tags.map(TagsInput::normalize).unwrap_or_default(),
        })
    }
}

/// Create/update body, read as JSON or as an urlencoded form.
///
/// Never rejects: an unreadable body is treated as an empty one, which then
/// fails validation with the required-fields message.
#[derive(Debug, Default)]
pub struct IdeaBody(pub IdeaPayload);

#[async_trait]
impl<S> FromRequest<S> for IdeaBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let payload = if is_form(req.headers()) {
            Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .ok()
                .and_then(|Form(pairs)| serde_json::from_value(form_object(pairs)).ok())
        } else {
            Json::<IdeaPayload>::from_request(req, state)
                .await
                .ok()
                .map(|Json(payload)| payload)
        };

        Ok(IdeaBody(payload.unwrap_or_default()))
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim_start().starts_with("application/x-www-form-urlencoded"))
        .unwrap_or(false)
}

/// Fold form pairs into a JSON object of strings. Repeated keys (and `key[]`)
/// collect into a list.
fn form_object(pairs: Vec<(String, String)>) -> Value {
    let mut object = Map::new();
    for (key, value) in pairs {
        let (key, listed) = match key.strip_suffix("[]") {
            Some(base) => (base.to_string(), true),
            None => (key, false),
        };

        match object.get_mut(&key) {
            Some(Value::Array(items)) => items.push(Value::String(value)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(value)]);
            }
            None if listed => {
                object.insert(key, Value::Array(vec![Value::String(value)]));
            }
            None => {
                object.insert(key, Value::String(value));
            }
        }
    }
    Value::Object(object)
}

fn required_text(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        _ => None,
    }
}

/// Identifiers are UUIDs; anything else is rejected before touching the store
pub fn parse_idea_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request(INVALID_IDEA_ID))
}

/// Id from a `:id` path segment; undecodable segments are malformed ids too
pub fn idea_id_from_path(path: Result<Path<String>, PathRejection>) -> Result<Uuid, ApiError> {
    match path {
        Ok(Path(raw)) => parse_idea_id(&raw),
        Err(rejection) => {
            tracing::debug!("Rejected idea id path segment: {}", rejection);
            Err(ApiError::bad_request(INVALID_IDEA_ID))
        }
    }
}

/// Lenient `_limit` parsing: leading whitespace, optional sign, leading digits.
///
/// Only a positive result caps the listing.
pub fn parse_limit(raw: Option<&str>) -> Option<i64> {
    let s = raw?.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    // Overflowing values saturate rather than disappear
    let magnitude = rest[..digits_len].parse::<i64>().unwrap_or(i64::MAX);
    match (negative, magnitude) {
        (false, n) if n > 0 => Some(n),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(body: Value) -> IdeaPayload {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn tags_from_comma_separated_string() {
        let draft = payload(json!({
            "title": "t", "description": "d", "summary": "s", "tags": "a, b ,c"
        }))
        .into_draft()
        .unwrap();
        assert_eq!(draft.tags, vec!["a", "b", "c"]);

        let draft = payload(json!({
            "title": "t", "description": "d", "summary": "s", "tags": " , x,, "
        }))
        .into_draft()
        .unwrap();
        assert_eq!(draft.tags, vec!["x"]);
    }

    #[test]
    fn tags_from_array_kept_as_given() {
        let draft = payload(json!({
            "title": "t", "description": "d", "summary": "s", "tags": ["x", "y"]
        }))
        .into_draft()
        .unwrap();
        assert_eq!(draft.tags, vec!["x", "y"]);
    }

    #[test]
    fn tags_of_other_types_become_empty() {
        for tags in [json!(42), json!({"a": 1}), json!(["x", 1]), json!(null), json!(true)] {
            let draft = payload(json!({
                "title": "t", "description": "d", "summary": "s", "tags": tags.clone()
            }))
            .into_draft()
            .unwrap();
            assert!(draft.tags.is_empty(), "tags {} not emptied", tags);
        }

        let draft = payload(json!({"title": "t", "description": "d", "summary": "s"}))
            .into_draft()
            .unwrap();
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn required_fields_are_trimmed() {
        let draft = payload(json!({
            "title": "  Solar kettle ", "description": " boils\n", "summary": "\tsun "
        }))
        .into_draft()
        .unwrap();
        assert_eq!(draft.title, "Solar kettle");
        assert_eq!(draft.description, "boils");
        assert_eq!(draft.summary, "sun");
    }

    #[test]
    fn missing_or_blank_fields_are_rejected() {
        let bodies = [
            json!({"title": "t", "description": "d"}),
            json!({"title": "   ", "description": "d", "summary": "s"}),
            json!({"title": "t", "description": 7, "summary": "s"}),
            json!({}),
        ];
        for body in bodies {
            let err = payload(body.clone()).into_draft().unwrap_err();
            assert_eq!(err.message(), REQUIRED_FIELDS, "body {}", body);
        }
    }

    #[test]
    fn idea_ids_must_be_uuids() {
        assert!(parse_idea_id("abc").is_err());
        assert!(parse_idea_id("").is_err());
        let id = Uuid::new_v4();
        assert_eq!(parse_idea_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn form_pairs_become_string_fields() {
        let pairs = vec![
            ("title".to_string(), "t".to_string()),
            ("description".to_string(), "d".to_string()),
            ("summary".to_string(), "s".to_string()),
            ("tags".to_string(), "a,b".to_string()),
        ];
        let draft = payload(form_object(pairs)).into_draft().unwrap();
        assert_eq!(draft.title, "t");
        assert_eq!(draft.tags, vec!["a", "b"]);
    }

    #[test]
    fn repeated_form_keys_collect_into_lists() {
        let pairs = vec![
            ("tags[]".to_string(), "x".to_string()),
            ("other".to_string(), "1".to_string()),
            ("other".to_string(), "2".to_string()),
            ("other".to_string(), "3".to_string()),
        ];
        assert_eq!(form_object(pairs), json!({ "tags": ["x"], "other": ["1", "2", "3"] }));
    }

    #[test]
    fn form_content_type_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_form(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded; charset=UTF-8".parse().unwrap(),
        );
        assert!(is_form(&headers));
        headers.insert(header::CONTENT_TYPE, "application/json".parse().unwrap());
        assert!(!is_form(&headers));
    }

    #[test]
    fn limit_parsing() {
        assert_eq!(parse_limit(Some("2")), Some(2));
        assert_eq!(parse_limit(Some(" 10")), Some(10));
        assert_eq!(parse_limit(Some("3abc")), Some(3));
        assert_eq!(parse_limit(Some("+4")), Some(4));
        assert_eq!(parse_limit(Some("-1")), None);
        assert_eq!(parse_limit(Some("0")), None);
        assert_eq!(parse_limit(Some("foo")), None);
        assert_eq!(parse_limit(Some("")), None);
        assert_eq!(parse_limit(None), None);
        assert_eq!(parse_limit(Some("99999999999999999999")), Some(i64::MAX));
    }
}

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One page of a keyword-filtered list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub keyword: String,
    pub page: u32,
    pub limit: u32,
    pub category_id: Option<u64>,
}

impl PageRequest {
    pub fn first(keyword: impl Into<String>, limit: u32, category_id: Option<u64>) -> Self {
        Self {
            keyword: keyword.into(),
            page: 0,
            limit,
            category_id,
        }
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }

    /// Query string pairs; `category_id` is only sent when present.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("keyword", self.keyword.clone()),
            ("page", self.page.to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(category_id) = self.category_id {
            pairs.push(("category_id", category_id.to_string()));
        }
        pairs
    }
}

/// What a list endpoint produced once the response envelope has been unwrapped.
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome<T> {
    Items(Vec<T>),
    /// `code != 0`, a missing result array or an unreadable body. Not an error.
    Empty,
}

impl<T> PageOutcome<T> {
    pub fn count(&self) -> usize {
        match self {
            PageOutcome::Items(items) => items.len(),
            PageOutcome::Empty => 0,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            PageOutcome::Items(items) => items,
            PageOutcome::Empty => Vec::new(),
        }
    }
}

/// `{ code, result }` wrapper used by every endpoint of the API.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub code: i64,
    pub result: Option<T>,
}

impl<T> Envelope<T> {
    /// The result, if the server reported success and sent one.
    pub fn into_result(self) -> Option<T> {
        if self.code == 0 { self.result } else { None }
    }
}

/// Unwraps `result.<key>` from a list response body.
///
/// Anything other than `code == 0` with an array under `key` is [`PageOutcome::Empty`],
/// including bodies that are not JSON at all.
pub fn page_from_body<T: DeserializeOwned>(body: &str, key: &str) -> PageOutcome<T> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        tracing::debug!(key, "gym.list.unparseable_body");
        return PageOutcome::Empty;
    };

    if value.get("code").and_then(Value::as_i64) != Some(0) {
        return PageOutcome::Empty;
    }

    let Some(array) = value
        .get("result")
        .and_then(|result| result.get(key))
        .filter(|items| items.is_array())
    else {
        return PageOutcome::Empty;
    };

    match serde_json::from_value::<Vec<T>>(array.clone()) {
        Ok(items) => PageOutcome::Items(items),
        Err(e) => {
            tracing::debug!(key, error = %e, "gym.list.malformed_items");
            PageOutcome::Empty
        }
    }
}

/// Accepts a string, number or bool and keeps it as text. The API is not
/// consistent about quoting fields like `time` or `calories`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Accepts a number or a numeric string.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

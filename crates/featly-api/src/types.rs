// Wire types for the `/api/features` resource.
//
// Field names follow the server's JSON (camelCase for items and meta,
// snake_case for list query parameters).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// `{ "data": T }` envelope used by the single-item endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

/// A feature item as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureItemResponse {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Parse a server timestamp. Accepts RFC 3339, a naive
/// `YYYY-MM-DD[ T]HH:MM:SS[.fff]` taken as UTC, or a bare date at
/// midnight UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp `{raw}`")))
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

/// `GET /api/features` response body.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureListResponse {
    pub data: Vec<FeatureItemResponse>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

/// Request body for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureItemForm {
    pub title: String,
    pub description: String,
}

/// Query parameters for `GET /api/features`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    /// One of `createdAt`, `title`, `updatedAt`.
    pub sort_by: String,
    /// `asc` or `desc`.
    pub sort_direction: String,
    pub page: u32,
    pub per_page: u32,
}

impl ListQuery {
    /// Render as `(name, value)` pairs using the server's parameter names.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.clone()),
            ("sort_by", self.sort_by.clone()),
            ("sort_direction", self.sort_direction.clone()),
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn query_uses_snake_case_names() {
        let query = ListQuery {
            search: "alp".into(),
            sort_by: "createdAt".into(),
            sort_direction: "desc".into(),
            page: 2,
            per_page: 10,
        };
        let names: Vec<_> = query.to_params().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            names,
            vec!["search", "sort_by", "sort_direction", "page", "per_page"]
        );
    }

    #[test]
    fn decodes_list_envelope() {
        let body = r#"{
            "data": [{
                "id": "f-1",
                "title": "Alpha",
                "description": "first",
                "createdAt": "2023-01-01T00:00:00Z",
                "updatedAt": "2023-01-02T00:00:00Z",
                "status": "draft"
            }],
            "meta": { "total": 1, "page": 1, "perPage": 10, "lastPage": 1 }
        }"#;
        let resp: FeatureListResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.data.len(), 1);
        assert_eq!(resp.data[0].status.as_deref(), Some("draft"));
        assert_eq!(resp.meta.unwrap().per_page, 10);
    }

    #[test]
    fn timestamps_accept_common_shapes() {
        use chrono::TimeZone;

        let midnight = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2023-01-01"), Some(midnight));
        assert_eq!(parse_timestamp("2023-01-01T00:00:00Z"), Some(midnight));
        assert_eq!(parse_timestamp("2023-01-01T02:00:00+02:00"), Some(midnight));
        assert_eq!(
            parse_timestamp("2023-01-01 09:30:00"),
            Some(Utc.with_ymd_and_hms(2023, 1, 1, 9, 30, 0).unwrap())
        );
        assert!(parse_timestamp("2023-01-01T09:30:00.250").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn unparseable_timestamp_names_the_value() {
        let body = r#"{ "id": "1", "title": "A", "createdAt": "soon", "updatedAt": "2023-01-01" }"#;
        let err = serde_json::from_str::<FeatureItemResponse>(body).unwrap_err();
        assert!(err.to_string().contains("`soon`"));
    }

    #[test]
    fn meta_is_optional() {
        let resp: FeatureListResponse = serde_json::from_str(r#"{ "data": [] }"#).unwrap();
        assert!(resp.data.is_empty());
        assert!(resp.meta.is_none());
    }
}

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::database::{PageRequest, Paged};
use crate::error::ApiError;

/// Common list-endpoint query surface: `?fields=&sort=&limit=&page=`
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Space-separated projection applied to the returned documents
    pub fields: Option<String>,
    #[serde(default = "default_sort")]
    pub sort: String,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default = "default_page")]
    pub page: i64,
}

fn default_sort() -> String {
    "id".to_string()
}

fn default_limit() -> i64 {
    20
}

fn default_page() -> i64 {
    1
}

impl ListParams {
    /// Resolve the sort key against the model's sortable columns. A leading
    /// `-` flips the direction. Unknown keys are a client error, never
    /// interpolated into SQL.
    pub fn page_request(
        &self,
        sortable: &'static [(&'static str, &'static str)],
    ) -> Result<PageRequest, ApiError> {
        if self.limit < 1 {
            return Err(ApiError::bad_request("\"limit\" must be at least 1"));
        }
        if self.page < 1 {
            return Err(ApiError::bad_request("\"page\" must be at least 1"));
        }

        let (descending, field) = match self.sort.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, self.sort.as_str()),
        };

        let column = sortable
            .iter()
            .find(|(wire, _)| *wire == field)
            .map(|(_, column)| *column)
            .ok_or_else(|| ApiError::bad_request(format!("Cannot sort by \"{}\"", field)))?;

        Ok(PageRequest {
            column,
            descending,
            limit: self.limit,
            page: self.page,
        })
    }
}

/// Serialize a page of documents, applying the optional field projection to
/// the data array.
pub fn paged_response<T: Serialize>(
    paged: Paged<T>,
    fields: Option<&str>,
) -> Result<Json<Value>, ApiError> {
    let mut value = serde_json::to_value(paged).map_err(|e| {
        tracing::error!("Failed to serialize paged response: {}", e);
        ApiError::internal_server_error("Failed to format response")
    })?;

    if let Some(fields) = fields {
        let data = value["data"].take();
        value["data"] = project_fields(data, fields);
    }

    Ok(Json(value))
}

/// Keep only the requested top-level keys on a document (or each document in
/// an array). The id always survives.
pub fn project_fields(value: Value, fields: &str) -> Value {
    let keep: Vec<&str> = fields.split_whitespace().collect();

    match value {
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| project_fields(item, fields))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(k, _)| k == "id" || keep.contains(&k.as_str()))
                .collect(),
        ),
        other => other,
    }
}

/// JSON body extractor that reports deserialization problems as a 400
/// validation error instead of the framework default.
pub struct ValidJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => Err(ApiError::validation_error(rejection.body_text())),
        }
    }
}

/// Required-string check matching the schema contract: present and non-empty
pub fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation_error(format!(
            "\"{}\" is not allowed to be empty",
            field
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SORTABLE: &[(&str, &str)] = &[("id", "id"), ("globalId", "global_id")];

    fn params(sort: &str, limit: i64, page: i64) -> ListParams {
        ListParams {
            fields: None,
            sort: sort.to_string(),
            limit,
            page,
        }
    }

    #[test]
    fn defaults_deserialize() {
        let p: ListParams = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.sort, "id");
        assert_eq!(p.limit, 20);
        assert_eq!(p.page, 1);
        assert!(p.fields.is_none());
    }

    #[test]
    fn ascending_sort_resolves_column() {
        let request = params("globalId", 20, 1).page_request(SORTABLE).unwrap();
        assert_eq!(request.column, "global_id");
        assert!(!request.descending);
    }

    #[test]
    fn dash_prefix_sorts_descending() {
        let request = params("-globalId", 20, 1).page_request(SORTABLE).unwrap();
        assert_eq!(request.column, "global_id");
        assert!(request.descending);
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let err = params("nope", 20, 1).page_request(SORTABLE).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn non_positive_limit_and_page_are_rejected() {
        assert!(params("id", 0, 1).page_request(SORTABLE).is_err());
        assert!(params("id", 20, 0).page_request(SORTABLE).is_err());
    }

    #[test]
    fn projection_keeps_requested_fields_and_id() {
        let doc = json!({"id": "1", "name": "Space Craft", "globalId": "9999BBB", "customer": "c1"});
        let projected = project_fields(doc, "name");
        assert_eq!(projected, json!({"id": "1", "name": "Space Craft"}));
    }

    #[test]
    fn projection_maps_over_arrays() {
        let docs = json!([
            {"id": "1", "name": "A", "customer": "x"},
            {"id": "2", "name": "B", "customer": "y"}
        ]);
        let projected = project_fields(docs, "customer");
        assert_eq!(
            projected,
            json!([{"id": "1", "customer": "x"}, {"id": "2", "customer": "y"}])
        );
    }

    #[test]
    fn require_rejects_empty_strings() {
        assert!(require("name", "").is_err());
        assert!(require("name", "   ").is_err());
        assert!(require("name", "ok").is_ok());
    }
}

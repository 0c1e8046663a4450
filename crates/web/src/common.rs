use axum::{
    extract::{OriginalUri, Query, Request},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::MethodFilter,
    Json,
};
use distance::{DistanceError, StoreError};
use model::ExampleData;
use schemars::{schema_for, schema_for_value, JsonSchema};
use serde::{Deserialize, Serialize};

pub type RouteResult<O> = Result<O, RouteErrorResponse>;

/// A `MethodFilter` that matches all http methods.
pub(crate) const METHOD_FILTER_ALL: MethodFilter = MethodFilter::GET
    .or(MethodFilter::POST)
    .or(MethodFilter::PATCH)
    .or(MethodFilter::PUT)
    .or(MethodFilter::DELETE);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub page_size: usize,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VecResponse<T> {
    pub data: Vec<T>,
    pub pagination: Option<Pagination>,
}

impl<T> VecResponse<T> {
    pub fn non_paginated(data: Vec<T>) -> Self {
        Self {
            data,
            pagination: None,
        }
    }

    pub fn paginated(
        data: Vec<T>,
        current_page: usize,
        total_pages: usize,
        total_items: usize,
        page_size: usize,
    ) -> Self {
        Self {
            data,
            pagination: Some(Pagination {
                current_page,
                total_pages,
                total_items,
                page_size,
            }),
        }
    }

    pub fn json(self) -> Json<Self> {
        Json(self)
    }
}

// - Services returning commonly used responses -

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SchemaParams {
    #[serde(default = "Default::default")]
    example_data: bool,
}

pub(crate) async fn schema<T: ExampleData + JsonSchema + Serialize>(
    Query(params): Query<SchemaParams>,
) -> impl IntoResponse {
    if params.example_data {
        Json(schema_for_value!(T::example_data()))
    } else {
        Json(schema_for!(T))
    }
}

pub(crate) async fn route_not_found(
    OriginalUri(original_uri): OriginalUri,
    req: Request,
) -> impl IntoResponse {
    RouteErrorResponse::not_found(req.method(), original_uri.path())
}

// - Commonly used responses -

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteErrorResponse {
    #[serde(skip)]
    pub status_code: StatusCode,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_method: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RouteErrorResponse {
    pub fn new(status_code: StatusCode) -> Self {
        Self {
            status_code,
            http_method: None,
            requested_uri: None,
            message: None,
        }
    }

    pub fn not_found(method: &Method, uri: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND)
            .with_method(method)
            .with_uri(uri)
            .with_default_message()
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY).with_message(message)
    }

    pub fn with_method(mut self, method: &Method) -> Self {
        self.http_method = Some(method.to_string());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.requested_uri = Some(uri.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_default_message(self) -> Self {
        let message = self
            .status_code
            .canonical_reason()
            .unwrap_or("unexpected error");
        self.with_message(message)
    }
}

impl From<StoreError> for RouteErrorResponse {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => Self::new(StatusCode::NOT_FOUND)
                .with_message("The requested item does not exist."),
            StoreError::Conflict(what) => Self::new(StatusCode::CONFLICT)
                .with_message(format!("conflict: {}", what)),
            StoreError::Other(why) => Self::new(StatusCode::INTERNAL_SERVER_ERROR)
                .with_message(format!("{}", why)),
        }
    }
}

impl From<DistanceError> for RouteErrorResponse {
    fn from(value: DistanceError) -> Self {
        let status_code = match &value {
            DistanceError::LocationNotFound(_) => StatusCode::NOT_FOUND,
            DistanceError::InsufficientWaypoints(_) => StatusCode::BAD_REQUEST,
            DistanceError::GeocodeNotFound(_)
            | DistanceError::RouteNotFound
            | DistanceError::MissingCoordinates(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DistanceError::MissingConfiguration => StatusCode::SERVICE_UNAVAILABLE,
            DistanceError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            DistanceError::Store(StoreError::Conflict(_)) => StatusCode::CONFLICT,
            DistanceError::Store(_) | DistanceError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self::new(status_code).with_message(format!("{}", value))
    }
}

impl IntoResponse for RouteErrorResponse {
    fn into_response(self) -> axum::response::Response {
        (self.status_code, Json(self)).into_response()
    }
}

use axum::extract::{rejection::JsonRejection, FromRequest};

use crate::shared::AppError;

/// JSON body extractor whose rejections use the `AppError` wire format
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request("Invalid JSON", rejection.body_text())
    }
}

//! Request extractors whose rejections use the catalog's JSON error envelope.
//!
//! axum's stock `Json`, `Query` and `Path` answer malformed input with a
//! plain-text body (and 422 for JSON that does not fit the type). These wrap
//! them and turn every rejection into [`AppError::Validation`], so clients
//! always get a 400 with `{"message", "data": {"error"}}`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

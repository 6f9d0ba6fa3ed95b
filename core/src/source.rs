//! The seam between the generic controller and each data source.
//!
//! A `Source` knows how to turn user input into an `HttpRequest` and how to
//! map the provider's `HttpResponse` into a display model. It holds nothing
//! but its base URL (and, for weather, the key), so building and parsing are
//! deterministic and testable without a network.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// The six data-backed screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Gender,
    Age,
    Universities,
    Weather,
    Creature,
    Articles,
}

impl Screen {
    pub const ALL: [Screen; 6] = [
        Screen::Gender,
        Screen::Age,
        Screen::Universities,
        Screen::Weather,
        Screen::Creature,
        Screen::Articles,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Screen::Gender => "gender",
            Screen::Age => "age",
            Screen::Universities => "universities",
            Screen::Weather => "weather",
            Screen::Creature => "creature",
            Screen::Articles => "articles",
        }
    }
}

/// Whether a screen is driven by user text or by a fixed query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPolicy {
    /// Free text; trimmed, and empty input fails locally.
    Required,
    /// No user input; the request is always the same. Supports refresh.
    Fixed,
}

/// Request builder plus response mapper for one provider.
pub trait Source {
    const SCREEN: Screen;
    const INPUT: InputPolicy;

    type Output: Clone + Serialize;

    /// Derived presentation fields (bands, labels, bar widths) that hosts
    /// render as-is next to the raw result.
    type Display: Serialize;

    /// Quick-pick inputs offered above the search field.
    const SUGGESTIONS: &'static [&'static str] = &[];

    /// `input` is `Some(trimmed, non-empty)` for `InputPolicy::Required`
    /// sources and `None` for fixed ones.
    fn build_request(&self, input: Option<&str>) -> Result<HttpRequest, ApiError>;

    fn parse_response(&self, response: HttpResponse) -> Result<Self::Output, ApiError>;

    fn display(output: &Self::Output) -> Self::Display;
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Status check followed by JSON decoding into the provider's wire shape.
pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    Ok(serde_json::from_str(&response.body)?)
}

/// Pulls the input out of the `Option` for text-driven sources.
pub(crate) fn required(input: Option<&str>) -> Result<&str, ApiError> {
    match input.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ApiError::MissingInput),
    }
}

/// Normalizes a configured base URL.
pub(crate) fn base(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

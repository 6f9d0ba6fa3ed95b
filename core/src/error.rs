//! Error types shared by every screen.
//!
//! # Design
//! Two tiers: local validation failures (`MissingInput`) never reach the
//! network, everything else is a remote failure. Variants keep the raw
//! detail for logs; what the user sees comes from `user_message`, a fixed
//! per-screen table. Gender, age and creature lookups collapse every remote
//! failure into a single message.

use thiserror::Error;

use crate::source::Screen;

/// Errors produced while building a request or mapping a response.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Required free-text input was empty after trimming.
    #[error("missing required input")]
    MissingInput,

    /// The weather provider key was not configured.
    #[error("weather API key is not configured")]
    MissingApiKey,

    /// A configured base URL could not be turned into a request URL.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// The host could not complete the round-trip.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The provider answered 404 for the requested resource.
    #[error("resource not found")]
    NotFound,

    /// Well-formed response carrying no matching data.
    #[error("no results")]
    NoResults,

    /// The body did not match the expected shape.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// True for failures detected before any network call.
    pub fn is_local(&self) -> bool {
        matches!(self, ApiError::MissingInput)
    }

    /// Fixed, localized message shown on `screen` for this error.
    pub fn user_message(&self, screen: Screen) -> &'static str {
        match (self, screen) {
            (ApiError::MissingInput, Screen::Gender | Screen::Age) => {
                "Por favor ingresa un nombre"
            }
            (ApiError::MissingInput, Screen::Universities) => {
                "Por favor ingresa el nombre de un país en inglés"
            }
            (ApiError::MissingInput, Screen::Creature) => {
                "Por favor ingresa el nombre de un Pokémon"
            }
            (ApiError::NoResults, Screen::Universities) => {
                "No se encontraron universidades para este país. Verifica que el nombre esté en inglés."
            }
            (_, Screen::Creature) => {
                "Pokémon no encontrado. Verifica el nombre e intenta de nuevo."
            }
            (_, Screen::Weather) => "Error al obtener datos del clima. Intenta de nuevo.",
            (_, Screen::Articles) => "Error al cargar las noticias. Intenta de nuevo.",
            (_, Screen::Gender | Screen::Age | Screen::Universities) => {
                "Error al conectar con el servicio. Intenta de nuevo."
            }
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Deserialization(err.to_string())
    }
}

//! Name-to-gender prediction (genderize.io).

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::source::{base, decode, required, InputPolicy, Screen, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    /// The provider had no prediction for this name.
    Unknown,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "Masculino",
            Gender::Female => "Femenino",
            Gender::Unknown => "No se pudo determinar",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Gender::Male => "👨",
            Gender::Female => "👩",
            Gender::Unknown => "❓",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Gender::Male => "#1976D2",
            Gender::Female => "#E91E63",
            Gender::Unknown => "#000000",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenderResult {
    pub name: String,
    pub gender: Gender,
    /// In `0.0..=1.0`.
    pub probability: f64,
    pub sample_count: u64,
}

impl GenderResult {
    pub fn probability_percent(&self) -> u32 {
        (self.probability.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenderDisplay {
    pub label: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub probability_percent: u32,
}

#[derive(Deserialize)]
struct WireGender {
    name: String,
    gender: Option<String>,
    #[serde(default)]
    probability: f64,
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Clone)]
pub struct GenderSource {
    base_url: String,
}

impl GenderSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base(base_url),
        }
    }
}

impl Source for GenderSource {
    const SCREEN: Screen = Screen::Gender;
    const INPUT: InputPolicy = InputPolicy::Required;

    type Output = GenderResult;
    type Display = GenderDisplay;

    fn build_request(&self, input: Option<&str>) -> Result<HttpRequest, ApiError> {
        let name = required(input)?;
        let mut url = Url::parse(&format!("{}/", self.base_url))?;
        url.query_pairs_mut().append_pair("name", name);
        Ok(HttpRequest::get(url.into()))
    }

    fn parse_response(&self, response: HttpResponse) -> Result<GenderResult, ApiError> {
        let wire: WireGender = decode(&response)?;
        let gender = match wire.gender.as_deref() {
            Some("male") => Gender::Male,
            Some("female") => Gender::Female,
            _ => Gender::Unknown,
        };
        Ok(GenderResult {
            name: wire.name,
            gender,
            probability: wire.probability,
            sample_count: wire.count,
        })
    }

    fn display(result: &GenderResult) -> GenderDisplay {
        GenderDisplay {
            label: result.gender.label(),
            emoji: result.gender.emoji(),
            color: result.gender.color(),
            probability_percent: result.probability_percent(),
        }
    }
}

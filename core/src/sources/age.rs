//! Name-to-age prediction (agify.io) and the age band classifier.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::source::{base, decode, required, InputPolicy, Screen, Source};

/// Life stage shown next to a predicted age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeBand {
    /// 0 to 17.
    Young,
    /// 18 to 59.
    Adult,
    /// 60 and over.
    Elder,
}

impl AgeBand {
    pub fn classify(age: u32) -> Self {
        match age {
            0..=17 => AgeBand::Young,
            18..=59 => AgeBand::Adult,
            _ => AgeBand::Elder,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeBand::Young => "Joven",
            AgeBand::Adult => "Adulto",
            AgeBand::Elder => "Anciano",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            AgeBand::Young => "¡Tienes toda la vida por delante!",
            AgeBand::Adult => "¡En la mejor etapa de la vida!",
            AgeBand::Elder => "¡Sabiduría y experiencia!",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            AgeBand::Young => "👶",
            AgeBand::Adult => "👨‍💼",
            AgeBand::Elder => "👴",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            AgeBand::Young => "#4CAF50",
            AgeBand::Adult => "#2196F3",
            AgeBand::Elder => "#FF9800",
        }
    }

    pub fn image_url(self) -> &'static str {
        match self {
            AgeBand::Young => {
                "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=200&h=200&fit=crop"
            }
            AgeBand::Adult => {
                "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=200&h=200&fit=crop"
            }
            AgeBand::Elder => {
                "https://images.unsplash.com/photo-1569779213435-ba3167ddf8d1?w=200&h=200&fit=crop"
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeResult {
    pub name: String,
    /// `None` when the provider has too little data for this name.
    pub age: Option<u32>,
    pub sample_count: u64,
}

impl AgeResult {
    pub fn band(&self) -> Option<AgeBand> {
        self.age.map(AgeBand::classify)
    }
}

/// Band presentation; every field is `None` when the age is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgeDisplay {
    pub band: Option<AgeBand>,
    pub label: Option<&'static str>,
    pub message: Option<&'static str>,
    pub emoji: Option<&'static str>,
    pub color: Option<&'static str>,
    pub image_url: Option<&'static str>,
}

#[derive(Deserialize)]
struct WireAge {
    name: String,
    age: Option<u32>,
    #[serde(default)]
    count: u64,
}

#[derive(Debug, Clone)]
pub struct AgeSource {
    base_url: String,
}

impl AgeSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base(base_url),
        }
    }
}

impl Source for AgeSource {
    const SCREEN: Screen = Screen::Age;
    const INPUT: InputPolicy = InputPolicy::Required;

    type Output = AgeResult;
    type Display = AgeDisplay;

    fn build_request(&self, input: Option<&str>) -> Result<HttpRequest, ApiError> {
        let name = required(input)?;
        let mut url = Url::parse(&format!("{}/", self.base_url))?;
        url.query_pairs_mut().append_pair("name", name);
        Ok(HttpRequest::get(url.into()))
    }

    fn parse_response(&self, response: HttpResponse) -> Result<AgeResult, ApiError> {
        let wire: WireAge = decode(&response)?;
        Ok(AgeResult {
            name: wire.name,
            age: wire.age,
            sample_count: wire.count,
        })
    }

    fn display(result: &AgeResult) -> AgeDisplay {
        let band = result.band();
        AgeDisplay {
            band,
            label: band.map(AgeBand::label),
            message: band.map(AgeBand::message),
            emoji: band.map(AgeBand::emoji),
            color: band.map(AgeBand::color),
            image_url: band.map(AgeBand::image_url),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_edges_are_inclusive() {
        assert_eq!(AgeBand::classify(0), AgeBand::Young);
        assert_eq!(AgeBand::classify(17), AgeBand::Young);
        assert_eq!(AgeBand::classify(18), AgeBand::Adult);
        assert_eq!(AgeBand::classify(59), AgeBand::Adult);
        assert_eq!(AgeBand::classify(60), AgeBand::Elder);
        assert_eq!(AgeBand::classify(200), AgeBand::Elder);
    }

    #[test]
    fn bands_carry_fixed_presentation() {
        assert_eq!(AgeBand::Young.label(), "Joven");
        assert_eq!(AgeBand::Adult.color(), "#2196F3");
        assert_eq!(AgeBand::Elder.emoji(), "👴");
    }

    #[test]
    fn builds_query_with_name() {
        let req = AgeSource::new("https://api.agify.io/")
            .build_request(Some("michael"))
            .unwrap();
        assert_eq!(req.url, "https://api.agify.io/?name=michael");
    }

    #[test]
    fn parses_prediction() {
        let body = r#"{"count":298219,"name":"michael","age":62}"#;
        let result = AgeSource::new("https://api.agify.io")
            .parse_response(HttpResponse::new(200, body))
            .unwrap();
        assert_eq!(result.age, Some(62));
        assert_eq!(result.band(), Some(AgeBand::Elder));
    }

    #[test]
    fn display_follows_band() {
        let result = AgeResult {
            name: "emma".into(),
            age: Some(17),
            sample_count: 1,
        };
        let display = AgeSource::display(&result);
        assert_eq!(display.band, Some(AgeBand::Young));
        assert_eq!(display.label, Some("Joven"));
        assert!(display.image_url.unwrap().contains("1544005313"));

        let unknown = AgeSource::display(&AgeResult { age: None, ..result });
        assert_eq!(unknown.band, None);
        assert_eq!(unknown.message, None);
    }

    #[test]
    fn null_age_is_a_valid_result() {
        let body = r#"{"count":0,"name":"xqzt","age":null}"#;
        let result = AgeSource::new("https://api.agify.io")
            .parse_response(HttpResponse::new(200, body))
            .unwrap();
        assert_eq!(result.age, None);
        assert_eq!(result.band(), None);
    }
}

//! Current conditions for a fixed location (weatherapi.com).
//!
//! The query never changes, so this screen supports refresh. The provider
//! key comes from configuration; without one, building the request fails
//! and the screen shows its usual remote-failure message.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::source::{base, decode, InputPolicy, Screen, Source};

pub const DEFAULT_QUERY: &str = "Santo Domingo, DO";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub country: String,
    pub local_time: String,
    pub temp_c: f64,
    pub temp_f: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_kph: f64,
    pub wind_dir: String,
    pub uv_index: f64,
    pub pressure_mb: f64,
    pub visibility_km: f64,
    pub condition_text: String,
}

impl WeatherSnapshot {
    pub fn uv_level(&self) -> UvLevel {
        UvLevel::classify(self.uv_index)
    }

    pub fn condition_icon(&self) -> &'static str {
        match self.condition_text.to_lowercase().as_str() {
            "soleado" => "☀️",
            "parcialmente nublado" => "⛅",
            "nublado" => "☁️",
            "lluvia ligera" => "🌧️",
            _ => "🌤️",
        }
    }

    pub fn condition_color(&self) -> &'static str {
        match self.condition_text.to_lowercase().as_str() {
            "soleado" => "#FFA726",
            "parcialmente nublado" => "#42A5F5",
            "nublado" => "#78909C",
            "lluvia ligera" => "#5C6BC0",
            _ => "#66BB6A",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherDisplay {
    pub uv_level: UvLevel,
    pub uv_label: &'static str,
    pub uv_color: &'static str,
    pub condition_icon: &'static str,
    pub condition_color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UvLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvLevel {
    pub fn classify(uv: f64) -> Self {
        if uv <= 2.0 {
            UvLevel::Low
        } else if uv <= 5.0 {
            UvLevel::Moderate
        } else if uv <= 7.0 {
            UvLevel::High
        } else if uv <= 10.0 {
            UvLevel::VeryHigh
        } else {
            UvLevel::Extreme
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            UvLevel::Low => "Bajo",
            UvLevel::Moderate => "Moderado",
            UvLevel::High => "Alto",
            UvLevel::VeryHigh => "Muy Alto",
            UvLevel::Extreme => "Extremo",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            UvLevel::Low => "#4CAF50",
            UvLevel::Moderate => "#FF9800",
            UvLevel::High => "#FF5722",
            UvLevel::VeryHigh => "#E91E63",
            UvLevel::Extreme => "#9C27B0",
        }
    }
}

#[derive(Deserialize)]
struct WireWeather {
    location: WireLocation,
    current: WireCurrent,
}

#[derive(Deserialize)]
struct WireLocation {
    name: String,
    country: String,
    localtime: String,
}

#[derive(Deserialize)]
struct WireCurrent {
    temp_c: f64,
    temp_f: f64,
    feelslike_c: f64,
    humidity: u8,
    wind_kph: f64,
    wind_dir: String,
    uv: f64,
    pressure_mb: f64,
    vis_km: f64,
    condition: WireCondition,
}

#[derive(Deserialize)]
struct WireCondition {
    text: String,
}

#[derive(Debug, Clone)]
pub struct WeatherSource {
    base_url: String,
    api_key: Option<String>,
}

impl WeatherSource {
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base(base_url),
            api_key,
        }
    }
}

impl Source for WeatherSource {
    const SCREEN: Screen = Screen::Weather;
    const INPUT: InputPolicy = InputPolicy::Fixed;

    type Output = WeatherSnapshot;
    type Display = WeatherDisplay;

    fn build_request(&self, _input: Option<&str>) -> Result<HttpRequest, ApiError> {
        let key = self.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;
        let mut url = Url::parse(&format!("{}/v1/current.json", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("key", key)
            .append_pair("q", DEFAULT_QUERY)
            .append_pair("aqi", "no")
            .append_pair("lang", "es");
        Ok(HttpRequest::get(url.into()))
    }

    fn parse_response(&self, response: HttpResponse) -> Result<WeatherSnapshot, ApiError> {
        let wire: WireWeather = decode(&response)?;
        Ok(WeatherSnapshot {
            location_name: wire.location.name,
            country: wire.location.country,
            local_time: wire.location.localtime,
            temp_c: wire.current.temp_c,
            temp_f: wire.current.temp_f,
            feels_like_c: wire.current.feelslike_c,
            humidity_pct: wire.current.humidity,
            wind_kph: wire.current.wind_kph,
            wind_dir: wire.current.wind_dir,
            uv_index: wire.current.uv,
            pressure_mb: wire.current.pressure_mb,
            visibility_km: wire.current.vis_km,
            condition_text: wire.current.condition.text,
        })
    }

    fn display(snap: &WeatherSnapshot) -> WeatherDisplay {
        let uv = snap.uv_level();
        WeatherDisplay {
            uv_level: uv,
            uv_label: uv.label(),
            uv_color: uv.color(),
            condition_icon: snap.condition_icon(),
            condition_color: snap.condition_color(),
        }
    }
}

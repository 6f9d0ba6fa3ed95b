//! University directory lookup by country, through an HTTPS proxy.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::source::{base, decode, required, InputPolicy, Screen, Source};

/// Quick-pick chips offered above the search field. Country names are in
/// English, which is what the directory expects.
pub const POPULAR_COUNTRIES: [&str; 10] = [
    "Dominican Republic",
    "United States",
    "United Kingdom",
    "Canada",
    "Germany",
    "France",
    "Spain",
    "Italy",
    "Japan",
    "Australia",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub region: Option<String>,
    /// First listed domain.
    pub domain: Option<String>,
    /// First listed web page, with a scheme.
    pub website_url: Option<String>,
}

impl University {
    /// Target of the "visit site" action; `None` means the action is omitted.
    pub fn visit_url(&self) -> Option<&str> {
        self.website_url.as_deref()
    }

    pub fn domain_label(&self) -> &str {
        self.domain.as_deref().unwrap_or("No disponible")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniversityListDisplay {
    pub count: usize,
    pub entries: Vec<UniversityDisplay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UniversityDisplay {
    pub domain_label: String,
    /// `None` hides the "visit site" action.
    pub visit_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniversityList {
    pub country: String,
    pub entries: Vec<University>,
}

#[derive(Deserialize)]
struct WireUniversity {
    name: String,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    web_pages: Vec<String>,
    #[serde(default)]
    domains: Vec<String>,
    #[serde(rename = "state-province", default)]
    state_province: Option<String>,
}

/// Prepends `https://` to bare host names.
pub fn with_scheme(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[derive(Debug, Clone)]
pub struct UniversitySource {
    base_url: String,
}

impl UniversitySource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base(base_url),
        }
    }

    fn map(wire: Vec<WireUniversity>) -> Result<UniversityList, ApiError> {
        let country = wire
            .first()
            .and_then(|u| u.country.clone())
            .unwrap_or_default();
        let entries: Vec<University> = wire
            .into_iter()
            .map(|u| University {
                name: u.name,
                region: u.state_province.filter(|r| !r.is_empty()),
                domain: u.domains.into_iter().next(),
                website_url: u.web_pages.first().map(|page| with_scheme(page)),
            })
            .collect();
        if entries.is_empty() {
            return Err(ApiError::NoResults);
        }
        Ok(UniversityList { country, entries })
    }
}

impl Source for UniversitySource {
    const SCREEN: Screen = Screen::Universities;
    const INPUT: InputPolicy = InputPolicy::Required;

    type Output = UniversityList;
    type Display = UniversityListDisplay;

    const SUGGESTIONS: &'static [&'static str] = &POPULAR_COUNTRIES;

    fn build_request(&self, input: Option<&str>) -> Result<HttpRequest, ApiError> {
        let country = required(input)?;
        let mut url = Url::parse(&format!("{}/proxy.php", self.base_url))?;
        url.query_pairs_mut().append_pair("country", country);
        Ok(HttpRequest::get(url.into()))
    }

    fn parse_response(&self, response: HttpResponse) -> Result<UniversityList, ApiError> {
        let wire: Vec<WireUniversity> = decode(&response)?;
        Self::map(wire)
    }

    fn display(list: &UniversityList) -> UniversityListDisplay {
        UniversityListDisplay {
            count: list.entries.len(),
            entries: list
                .entries
                .iter()
                .map(|u| UniversityDisplay {
                    domain_label: u.domain_label().to_string(),
                    visit_url: u.visit_url().map(str::to_string),
                })
                .collect(),
        }
    }
}

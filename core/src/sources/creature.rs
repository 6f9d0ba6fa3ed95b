//! Creature database lookup (PokéAPI).

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::source::{base, decode, required, InputPolicy, Screen, Source};

/// Upper bound of a base stat; bar widths are relative to it.
pub const MAX_STAT: u32 = 255;

pub const POPULAR_CREATURES: [&str; 10] = [
    "pikachu",
    "charizard",
    "blastoise",
    "venusaur",
    "mewtwo",
    "mew",
    "lugia",
    "rayquaza",
    "arceus",
    "lucario",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatTier {
    High,
    Medium,
    Low,
}

impl StatTier {
    pub fn color(self) -> &'static str {
        match self {
            StatTier::High => "#4CAF50",
            StatTier::Medium => "#FF9800",
            StatTier::Low => "#F44336",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureStat {
    pub name: String,
    pub value: u32,
}

impl CreatureStat {
    /// Bar width in `0.0..=1.0`; values above `MAX_STAT` fill the bar.
    pub fn bar_fraction(&self) -> f64 {
        (f64::from(self.value) / f64::from(MAX_STAT)).min(1.0)
    }

    pub fn tier(&self) -> StatTier {
        let percent = self.bar_fraction() * 100.0;
        if percent > 75.0 {
            StatTier::High
        } else if percent > 50.0 {
            StatTier::Medium
        } else {
            StatTier::Low
        }
    }

    pub fn label(&self) -> String {
        match self.name.as_str() {
            "hp" => "HP".to_string(),
            "attack" => "Ataque".to_string(),
            "defense" => "Defensa".to_string(),
            "special-attack" => "Ataque Esp.".to_string(),
            "special-defense" => "Defensa Esp.".to_string(),
            "speed" => "Velocidad".to_string(),
            other => capitalize_first(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureProfile {
    pub id: u32,
    pub name: String,
    pub sprite_url: Option<String>,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub base_experience: Option<u32>,
    /// Decimetres.
    pub height_dm: u32,
    /// Hectograms.
    pub weight_hg: u32,
    pub stats: Vec<CreatureStat>,
    pub cry_url: Option<String>,
}

impl CreatureProfile {
    pub fn dex_number(&self) -> String {
        format!("#{:03}", self.id)
    }

    pub fn display_name(&self) -> String {
        capitalize_first(&self.name)
    }

    pub fn height_m(&self) -> f64 {
        f64::from(self.height_dm) / 10.0
    }

    pub fn weight_kg(&self) -> f64 {
        f64::from(self.weight_hg) / 10.0
    }

    pub fn ability_labels(&self) -> Vec<String> {
        self.abilities
            .iter()
            .map(|a| capitalize_first(&a.replacen('-', " ", 1)))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatureDisplay {
    pub dex_number: String,
    pub display_name: String,
    pub height_m: f64,
    pub weight_kg: f64,
    pub ability_labels: Vec<String>,
    pub types: Vec<TypeBadge>,
    pub stats: Vec<StatDisplay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBadge {
    pub name: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatDisplay {
    pub label: String,
    pub value: u32,
    pub bar_fraction: f64,
    pub tier: StatTier,
    pub color: &'static str,
}

pub fn type_color(kind: &str) -> &'static str {
    match kind {
        "normal" => "#A8A878",
        "fire" => "#F08030",
        "water" => "#6890F0",
        "electric" => "#F8D030",
        "grass" => "#78C850",
        "ice" => "#98D8D8",
        "fighting" => "#C03028",
        "poison" => "#A040A0",
        "ground" => "#E0C068",
        "flying" => "#A890F0",
        "psychic" => "#F85888",
        "bug" => "#A8B820",
        "rock" => "#B8A038",
        "ghost" => "#705898",
        "dragon" => "#7038F8",
        "dark" => "#705848",
        "steel" => "#B8B8D0",
        "fairy" => "#EE99AC",
        _ => "#68A090",
    }
}

pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Deserialize)]
struct WireCreature {
    id: u32,
    name: String,
    #[serde(default)]
    base_experience: Option<u32>,
    height: u32,
    weight: u32,
    sprites: WireSprites,
    #[serde(default)]
    cries: Option<WireCries>,
    #[serde(default)]
    types: Vec<WireTypeSlot>,
    #[serde(default)]
    abilities: Vec<WireAbilitySlot>,
    #[serde(default)]
    stats: Vec<WireStat>,
}

#[derive(Deserialize)]
struct WireSprites {
    front_default: Option<String>,
    #[serde(default)]
    other: Option<WireOtherSprites>,
}

#[derive(Deserialize)]
struct WireOtherSprites {
    #[serde(rename = "official-artwork", default)]
    official_artwork: Option<WireArtwork>,
}

#[derive(Deserialize)]
struct WireArtwork {
    front_default: Option<String>,
}

#[derive(Deserialize)]
struct WireCries {
    latest: Option<String>,
}

#[derive(Deserialize)]
struct WireNamed {
    name: String,
}

#[derive(Deserialize)]
struct WireTypeSlot {
    #[serde(rename = "type")]
    kind: WireNamed,
}

#[derive(Deserialize)]
struct WireAbilitySlot {
    ability: WireNamed,
}

#[derive(Deserialize)]
struct WireStat {
    base_stat: u32,
    stat: WireNamed,
}

#[derive(Debug, Clone)]
pub struct CreatureSource {
    base_url: String,
}

impl CreatureSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base(base_url),
        }
    }
}

impl Source for CreatureSource {
    const SCREEN: Screen = Screen::Creature;
    const INPUT: InputPolicy = InputPolicy::Required;

    type Output = CreatureProfile;
    type Display = CreatureDisplay;

    const SUGGESTIONS: &'static [&'static str] = &POPULAR_CREATURES;

    fn build_request(&self, input: Option<&str>) -> Result<HttpRequest, ApiError> {
        let name = required(input)?.to_lowercase();
        // `.` and `..` would collapse the path onto the collection endpoint.
        if name.chars().all(|c| c == '.') {
            return Err(ApiError::NotFound);
        }
        let mut url = Url::parse(&format!("{}/api/v2/pokemon/", self.base_url))?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .push(&name);
        Ok(HttpRequest::get(url.into()))
    }

    fn parse_response(&self, response: HttpResponse) -> Result<CreatureProfile, ApiError> {
        let wire: WireCreature = decode(&response)?;
        let artwork = wire
            .sprites
            .other
            .and_then(|o| o.official_artwork)
            .and_then(|a| a.front_default);
        Ok(CreatureProfile {
            id: wire.id,
            name: wire.name,
            sprite_url: artwork.or(wire.sprites.front_default),
            types: wire.types.into_iter().map(|t| t.kind.name).collect(),
            abilities: wire.abilities.into_iter().map(|a| a.ability.name).collect(),
            base_experience: wire.base_experience,
            height_dm: wire.height,
            weight_hg: wire.weight,
            stats: wire
                .stats
                .into_iter()
                .map(|s| CreatureStat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            cry_url: wire.cries.and_then(|c| c.latest),
        })
    }

    fn display(profile: &CreatureProfile) -> CreatureDisplay {
        CreatureDisplay {
            dex_number: profile.dex_number(),
            display_name: profile.display_name(),
            height_m: profile.height_m(),
            weight_kg: profile.weight_kg(),
            ability_labels: profile.ability_labels(),
            types: profile
                .types
                .iter()
                .map(|t| TypeBadge {
                    name: t.clone(),
                    color: type_color(t),
                })
                .collect(),
            stats: profile
                .stats
                .iter()
                .map(|s| StatDisplay {
                    label: s.label(),
                    value: s.value,
                    bar_fraction: s.bar_fraction(),
                    tier: s.tier(),
                    color: s.tier().color(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> CreatureSource {
        CreatureSource::new("https://pokeapi.co")
    }

    const PIKACHU: &str = r#"{
        "id": 25, "name": "pikachu", "base_experience": 112, "height": 4, "weight": 60,
        "sprites": {
            "front_default": "https://img.test/25.png",
            "other": {"official-artwork": {"front_default": "https://img.test/art/25.png"}}
        },
        "cries": {"latest": "https://cries.test/25.ogg", "legacy": null},
        "types": [{"slot": 1, "type": {"name": "electric", "url": ""}}],
        "abilities": [
            {"ability": {"name": "static", "url": ""}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "lightning-rod", "url": ""}, "is_hidden": true, "slot": 3}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}
        ]
    }"#;

    #[test]
    fn name_is_lowercased_into_path() {
        let req = source().build_request(Some("Pikachu")).unwrap();
        assert_eq!(req.url, "https://pokeapi.co/api/v2/pokemon/pikachu");
    }

    #[test]
    fn path_segment_is_encoded() {
        let req = source().build_request(Some("mr mime")).unwrap();
        assert_eq!(req.url, "https://pokeapi.co/api/v2/pokemon/mr%20mime");
    }

    #[test]
    fn dot_only_names_never_reach_the_network() {
        for name in [".", "..", " ... "] {
            let err = source().build_request(Some(name)).unwrap_err();
            assert!(matches!(err, ApiError::NotFound), "{name:?}");
        }
        let req = source().build_request(Some("mr.mime")).unwrap();
        assert_eq!(req.url, "https://pokeapi.co/api/v2/pokemon/mr.mime");
    }

    #[test]
    fn display_carries_bars_and_badges() {
        let profile = source().parse_response(HttpResponse::new(200, PIKACHU)).unwrap();
        let display = CreatureSource::display(&profile);
        assert_eq!(display.dex_number, "#025");
        assert_eq!(display.types[0].color, "#F8D030");
        assert_eq!(display.stats[0].label, "HP");
        assert!((display.stats[1].bar_fraction - 90.0 / 255.0).abs() < 1e-9);
        assert_eq!(display.stats[1].tier, StatTier::Low);
        assert_eq!(display.stats[1].color, "#F44336");
    }

    #[test]
    fn maps_profile() {
        let profile = source().parse_response(HttpResponse::new(200, PIKACHU)).unwrap();
        assert_eq!(profile.dex_number(), "#025");
        assert_eq!(profile.display_name(), "Pikachu");
        assert_eq!(profile.sprite_url.as_deref(), Some("https://img.test/art/25.png"));
        assert_eq!(profile.types, vec!["electric"]);
        assert_eq!(profile.ability_labels(), vec!["Static", "Lightning rod"]);
        assert_eq!(profile.height_m(), 0.4);
        assert_eq!(profile.weight_kg(), 6.0);
        assert_eq!(profile.cry_url.as_deref(), Some("https://cries.test/25.ogg"));
        assert_eq!(profile.stats[1].label(), "Velocidad");
    }

    #[test]
    fn sprite_falls_back_to_front_default() {
        let body = r#"{"id":132,"name":"ditto","height":3,"weight":40,
            "sprites":{"front_default":"https://img.test/132.png","other":{"official-artwork":{"front_default":null}}}}"#;
        let profile = source().parse_response(HttpResponse::new(200, body)).unwrap();
        assert_eq!(profile.sprite_url.as_deref(), Some("https://img.test/132.png"));
        assert_eq!(profile.cry_url, None);
        assert_eq!(profile.base_experience, None);
    }

    #[test]
    fn unknown_creature_is_not_found() {
        let err = source()
            .parse_response(HttpResponse::new(404, "Not Found"))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn stat_bar_scales_by_255_and_clamps() {
        let stat = |value| CreatureStat {
            name: "attack".into(),
            value,
        };
        assert_eq!(stat(0).bar_fraction(), 0.0);
        assert_eq!(stat(255).bar_fraction(), 1.0);
        assert!((stat(51).bar_fraction() - 0.2).abs() < 1e-9);
        assert_eq!(stat(300).bar_fraction(), 1.0);
    }

    #[test]
    fn stat_tiers() {
        let stat = |value| CreatureStat {
            name: "hp".into(),
            value,
        };
        assert_eq!(stat(200).tier(), StatTier::High);
        assert_eq!(stat(150).tier(), StatTier::Medium);
        assert_eq!(stat(90).tier(), StatTier::Low);
    }

    #[test]
    fn unknown_type_gets_fallback_color() {
        assert_eq!(type_color("fire"), "#F08030");
        assert_eq!(type_color("shadow"), "#68A090");
    }
}

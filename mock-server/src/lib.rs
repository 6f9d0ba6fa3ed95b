//! Offline stand-in for the six public providers.
//!
//! Each provider is mounted under its own prefix (see
//! `screens_core::Endpoints::mirrored`) and answers from fixed fixtures in
//! the provider's own wire shape, including its "no data" and error shapes.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::debug;

/// Key the weather mock treats as disabled.
pub const DISABLED_WEATHER_KEY: &str = "invalid";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenderPrediction {
    pub count: u64,
    pub name: String,
    pub gender: Option<String>,
    pub probability: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgePrediction {
    pub count: u64,
    pub name: String,
    pub age: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct University {
    pub name: String,
    pub country: String,
    pub alpha_two_code: String,
    #[serde(rename = "state-province")]
    pub state_province: Option<String>,
    pub domains: Vec<String>,
    pub web_pages: Vec<String>,
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

#[derive(Deserialize)]
pub struct CountryQuery {
    pub country: Option<String>,
}

#[derive(Deserialize)]
pub struct WeatherQuery {
    pub key: Option<String>,
    pub q: Option<String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/genderize/", get(genderize))
        .route("/agify/", get(agify))
        .route("/universities/proxy.php", get(universities))
        .route("/weatherapi/v1/current.json", get(current_weather))
        .route("/pokeapi/api/v2/pokemon/{name}", get(pokemon))
        .route("/blog/wp-json/wp/v2/posts", get(posts))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn missing_name() -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"error": "Missing 'name' parameter"})),
    )
        .into_response()
}

async fn genderize(Query(query): Query<NameQuery>) -> Response {
    let Some(name) = query.name else {
        return missing_name();
    };
    debug!(%name, "genderize");
    let (gender, probability, count) = match name.to_lowercase().as_str() {
        "maria" => (Some("female"), 0.98, 1_352_410),
        "ana" => (Some("female"), 0.99, 403_122),
        "juan" => (Some("male"), 0.99, 1_076_554),
        "luis" => (Some("male"), 0.99, 602_891),
        _ => (None, 0.0, 0),
    };
    Json(GenderPrediction {
        count,
        name,
        gender: gender.map(str::to_string),
        probability,
    })
    .into_response()
}

async fn agify(Query(query): Query<NameQuery>) -> Response {
    let Some(name) = query.name else {
        return missing_name();
    };
    debug!(%name, "agify");
    let (age, count) = match name.to_lowercase().as_str() {
        "michael" => (Some(62), 298_219),
        "emma" => (Some(14), 120_004),
        "maria" => (Some(48), 870_251),
        _ => (None, 0),
    };
    Json(AgePrediction { count, name, age }).into_response()
}

fn dominican_universities() -> Vec<University> {
    vec![
        University {
            name: "Universidad Autónoma de Santo Domingo".into(),
            country: "Dominican Republic".into(),
            alpha_two_code: "DO".into(),
            state_province: Some("Santo Domingo".into()),
            domains: vec!["uasd.edu.do".into()],
            web_pages: vec!["http://www.uasd.edu.do/".into()],
        },
        University {
            name: "Instituto Tecnológico de Santo Domingo".into(),
            country: "Dominican Republic".into(),
            alpha_two_code: "DO".into(),
            state_province: None,
            domains: vec!["intec.edu.do".into(), "intec.do".into()],
            web_pages: vec!["www.intec.edu.do".into()],
        },
        University {
            name: "Universidad Tecnológica del Cibao".into(),
            country: "Dominican Republic".into(),
            alpha_two_code: "DO".into(),
            state_province: Some("La Vega".into()),
            domains: vec![],
            web_pages: vec![],
        },
    ]
}

async fn universities(Query(query): Query<CountryQuery>) -> Json<Vec<University>> {
    let country = query.country.unwrap_or_default();
    debug!(%country, "universities");
    if country.eq_ignore_ascii_case("Dominican Republic") {
        Json(dominican_universities())
    } else {
        Json(Vec::new())
    }
}

async fn current_weather(Query(query): Query<WeatherQuery>) -> Response {
    match query.key.as_deref() {
        None | Some("") => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": {"code": 1002, "message": "API key is invalid or not provided."}})),
            )
                .into_response();
        }
        Some(DISABLED_WEATHER_KEY) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({"error": {"code": 2008, "message": "API key has been disabled."}})),
            )
                .into_response();
        }
        Some(_) => {}
    }
    debug!(q = ?query.q, "current weather");
    Json(json!({
        "location": {
            "name": "Santo Domingo",
            "region": "Distrito Nacional",
            "country": "Dominican Republic",
            "lat": 18.47,
            "lon": -69.9,
            "tz_id": "America/Santo_Domingo",
            "localtime": "2024-05-01 14:30"
        },
        "current": {
            "temp_c": 31.0,
            "temp_f": 87.8,
            "is_day": 1,
            "condition": {
                "text": "Parcialmente nublado",
                "icon": "//cdn.weatherapi.com/weather/64x64/day/116.png",
                "code": 1003
            },
            "wind_kph": 18.4,
            "wind_dir": "ESE",
            "pressure_mb": 1012.0,
            "humidity": 66,
            "feelslike_c": 35.2,
            "vis_km": 10.0,
            "uv": 8.0
        }
    }))
    .into_response()
}

fn pikachu() -> Value {
    json!({
        "id": 25,
        "name": "pikachu",
        "base_experience": 112,
        "height": 4,
        "weight": 60,
        "sprites": {
            "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/25.png",
            "other": {
                "official-artwork": {
                    "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork/25.png"
                }
            }
        },
        "cries": {
            "latest": "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/latest/25.ogg",
            "legacy": "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/legacy/25.ogg"
        },
        "types": [{"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}],
        "abilities": [
            {"ability": {"name": "static", "url": "https://pokeapi.co/api/v2/ability/9/"}, "is_hidden": false, "slot": 1},
            {"ability": {"name": "lightning-rod", "url": "https://pokeapi.co/api/v2/ability/31/"}, "is_hidden": true, "slot": 3}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp"}},
            {"base_stat": 55, "effort": 0, "stat": {"name": "attack"}},
            {"base_stat": 40, "effort": 0, "stat": {"name": "defense"}},
            {"base_stat": 50, "effort": 0, "stat": {"name": "special-attack"}},
            {"base_stat": 50, "effort": 0, "stat": {"name": "special-defense"}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed"}}
        ]
    })
}

fn ditto() -> Value {
    json!({
        "id": 132,
        "name": "ditto",
        "base_experience": 101,
        "height": 3,
        "weight": 40,
        "sprites": {
            "front_default": "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/132.png",
            "other": {"official-artwork": {"front_default": null}}
        },
        "cries": {"latest": null, "legacy": null},
        "types": [{"slot": 1, "type": {"name": "normal"}}],
        "abilities": [{"ability": {"name": "limber"}, "is_hidden": false, "slot": 1}],
        "stats": [{"base_stat": 48, "effort": 1, "stat": {"name": "hp"}}]
    })
}

async fn pokemon(Path(name): Path<String>) -> Response {
    debug!(%name, "pokemon");
    match name.as_str() {
        "pikachu" | "25" => Json(pikachu()).into_response(),
        "ditto" | "132" => Json(ditto()).into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

fn post(id: u64, title: &str, excerpt: &str, date: &str, author: &str, image: Option<&str>) -> Value {
    let (featured_media, media) = match image {
        Some(url) => (id * 10, json!([{"id": id * 10, "source_url": url}])),
        None => (0, json!([])),
    };
    json!({
        "id": id,
        "date": date,
        "link": format!("https://kinsta.com/blog/post-{id}/"),
        "title": {"rendered": title},
        "excerpt": {"rendered": excerpt, "protected": false},
        "author": 1,
        "featured_media": featured_media,
        "_embedded": {
            "author": [{"id": 1, "name": author}],
            "wp:featuredmedia": media
        }
    })
}

fn all_posts() -> Vec<Value> {
    vec![
        post(
            104,
            "WordPress 6.5 &#8211; Qu&eacute; hay de nuevo",
            "<p>La nueva versi&oacute;n trae la biblioteca de fuentes, mejoras de rendimiento en el editor y un sistema de dependencias entre plugins que los administradores llevaban tiempo pidiendo para sus sitios.</p>\n",
            "2024-05-01T09:05:00",
            "Ana Pérez",
            Some("https://kinsta.com/wp-content/uploads/2024/05/wp65.jpg"),
        ),
        post(
            103,
            "C&oacute;mo usar una CDN",
            "<p>Una CDN acerca tu contenido a los visitantes.</p>\n",
            "2024-04-20T16:30:00",
            "Luis Gómez",
            None,
        ),
        post(
            102,
            "Cach&eacute; de objetos con Redis",
            "<p>Reduce las consultas a la base de datos.</p>\n",
            "2024-04-02T08:00:00",
            "Ana Pérez",
            Some("https://kinsta.com/wp-content/uploads/2024/04/redis.jpg"),
        ),
        post(
            101,
            "Gu&iacute;a de PHP 8.3",
            "<p>Novedades del lenguaje.</p>\n",
            "2024-03-15T12:00:00",
            "Marta Ruiz",
            None,
        ),
    ]
}

async fn posts(Query(params): Query<HashMap<String, String>>) -> Json<Vec<Value>> {
    let per_page = params
        .get("per_page")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(10);
    let embed = params.contains_key("_embed");
    debug!(per_page, embed, "posts");
    let posts = all_posts()
        .into_iter()
        .take(per_page)
        .map(|mut post| {
            if !embed {
                if let Some(obj) = post.as_object_mut() {
                    obj.remove("_embedded");
                }
            }
            post
        })
        .collect();
    Json(posts)
}

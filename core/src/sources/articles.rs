//! Latest posts from a WordPress blog (REST API, embedded author and media).

use std::sync::LazyLock;

use chrono::{Locale, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::source::{base, decode, InputPolicy, Screen, Source};

pub const ARTICLE_COUNT: u32 = 3;

/// Excerpts longer than this many characters are cut and get `ELLIPSIS`.
pub const EXCERPT_MAX_CHARS: usize = 150;
pub const ELLIPSIS: &str = "...";

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag regex"));
static ENTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&[^;]+;").expect("entity regex"));

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub excerpt_text: String,
    pub link: String,
    /// As reported by the blog (site-local time, no offset).
    pub published_at: String,
    pub author_name: Option<String>,
    pub image_url: Option<String>,
}

impl Article {
    /// Spanish long form, e.g. "1 de mayo de 2024, 09:05". `None` when the
    /// timestamp does not parse.
    pub fn published_label(&self) -> Option<String> {
        let at = NaiveDateTime::parse_from_str(&self.published_at, "%Y-%m-%dT%H:%M:%S").ok()?;
        Some(
            at.and_utc()
                .format_localized("%-d de %B de %Y, %H:%M", Locale::es_ES)
                .to_string(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDisplay {
    pub id: u64,
    pub published_label: Option<String>,
}

/// Removes tags, replaces entities with a space, trims.
pub fn strip_html(html: &str) -> String {
    let without_tags = TAG_REGEX.replace_all(html, "");
    ENTITY_REGEX.replace_all(&without_tags, " ").trim().to_string()
}

pub fn truncate_excerpt(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(EXCERPT_MAX_CHARS).collect();
    cut.push_str(ELLIPSIS);
    cut
}

#[derive(Deserialize)]
struct WirePost {
    id: u64,
    title: WireRendered,
    excerpt: WireRendered,
    link: String,
    date: String,
    #[serde(rename = "_embedded", default)]
    embedded: Option<WireEmbedded>,
}

#[derive(Deserialize)]
struct WireRendered {
    rendered: String,
}

#[derive(Deserialize)]
struct WireEmbedded {
    #[serde(default)]
    author: Vec<WireAuthor>,
    #[serde(rename = "wp:featuredmedia", default)]
    featured_media: Vec<WireMedia>,
}

#[derive(Deserialize)]
struct WireAuthor {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct WireMedia {
    #[serde(default)]
    source_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArticleSource {
    base_url: String,
}

impl ArticleSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base(base_url),
        }
    }
}

impl Source for ArticleSource {
    const SCREEN: Screen = Screen::Articles;
    const INPUT: InputPolicy = InputPolicy::Fixed;

    type Output = Vec<Article>;
    type Display = Vec<ArticleDisplay>;

    fn build_request(&self, _input: Option<&str>) -> Result<HttpRequest, ApiError> {
        let url = Url::parse(&format!(
            "{}/wp-json/wp/v2/posts?per_page={ARTICLE_COUNT}&_embed",
            self.base_url
        ))?;
        Ok(HttpRequest::get(url.into()))
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Vec<Article>, ApiError> {
        let posts: Vec<WirePost> = decode(&response)?;
        Ok(posts
            .into_iter()
            .map(|post| {
                let (author_name, image_url) = match post.embedded {
                    Some(embedded) => (
                        embedded.author.into_iter().next().and_then(|a| a.name),
                        embedded
                            .featured_media
                            .into_iter()
                            .next()
                            .and_then(|m| m.source_url),
                    ),
                    None => (None, None),
                };
                Article {
                    id: post.id,
                    title: strip_html(&post.title.rendered),
                    excerpt_text: truncate_excerpt(&strip_html(&post.excerpt.rendered)),
                    link: post.link,
                    published_at: post.date,
                    author_name: author_name.filter(|n| !n.is_empty()),
                    image_url: image_url.filter(|u| !u.is_empty()),
                }
            })
            .collect())
    }

    fn display(posts: &Vec<Article>) -> Vec<ArticleDisplay> {
        posts
            .iter()
            .map(|a| ArticleDisplay {
                id: a.id,
                published_label: a.published_label(),
            })
            .collect()
    }
}

//! One `Source` per provider: request builder, response mapper and the
//! small display rules that belong with each payload.

pub mod age;
pub mod articles;
pub mod creature;
pub mod gender;
pub mod universities;
pub mod weather;

pub use age::{AgeBand, AgeDisplay, AgeResult, AgeSource};
pub use articles::{Article, ArticleDisplay, ArticleSource};
pub use creature::{CreatureDisplay, CreatureProfile, CreatureSource, CreatureStat, StatDisplay, StatTier, TypeBadge};
pub use gender::{Gender, GenderDisplay, GenderResult, GenderSource};
pub use universities::{University, UniversityDisplay, UniversityList, UniversityListDisplay, UniversitySource};
pub use weather::{UvLevel, WeatherDisplay, WeatherSnapshot, WeatherSource};

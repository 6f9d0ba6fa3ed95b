//! The six screens, wired from one `Config`.
//!
//! Screens share nothing: each controller owns its own state and token
//! counter.

use crate::config::Config;
use crate::controller::{QueryController, ScreenController};
use crate::source::Screen;
use crate::sources::{
    AgeSource, ArticleSource, CreatureSource, GenderSource, UniversitySource, WeatherSource,
};

pub struct App {
    gender: QueryController<GenderSource>,
    age: QueryController<AgeSource>,
    universities: QueryController<UniversitySource>,
    weather: QueryController<WeatherSource>,
    creature: QueryController<CreatureSource>,
    articles: QueryController<ArticleSource>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let endpoints = &config.endpoints;
        Self {
            gender: QueryController::new(GenderSource::new(&endpoints.genderize)),
            age: QueryController::new(AgeSource::new(&endpoints.agify)),
            universities: QueryController::new(UniversitySource::new(&endpoints.universities)),
            weather: QueryController::new(WeatherSource::new(
                &endpoints.weather,
                config.weather_api_key.clone(),
            )),
            creature: QueryController::new(CreatureSource::new(&endpoints.pokeapi)),
            articles: QueryController::new(ArticleSource::new(&endpoints.blog)),
        }
    }

    pub fn controller(&self, screen: Screen) -> &dyn ScreenController {
        match screen {
            Screen::Gender => &self.gender,
            Screen::Age => &self.age,
            Screen::Universities => &self.universities,
            Screen::Weather => &self.weather,
            Screen::Creature => &self.creature,
            Screen::Articles => &self.articles,
        }
    }

    pub fn controller_mut(&mut self, screen: Screen) -> &mut dyn ScreenController {
        match screen {
            Screen::Gender => &mut self.gender,
            Screen::Age => &mut self.age,
            Screen::Universities => &mut self.universities,
            Screen::Weather => &mut self.weather,
            Screen::Creature => &mut self.creature,
            Screen::Articles => &mut self.articles,
        }
    }

    pub fn gender(&self) -> &QueryController<GenderSource> {
        &self.gender
    }

    pub fn age(&self) -> &QueryController<AgeSource> {
        &self.age
    }

    pub fn universities(&self) -> &QueryController<UniversitySource> {
        &self.universities
    }

    pub fn weather(&self) -> &QueryController<WeatherSource> {
        &self.weather
    }

    pub fn creature(&self) -> &QueryController<CreatureSource> {
        &self.creature
    }

    pub fn articles(&self) -> &QueryController<ArticleSource> {
        &self.articles
    }

    /// Cry of the creature currently on screen, if any.
    pub fn creature_cry_url(&self) -> Option<&str> {
        self.creature
            .state()
            .result()
            .and_then(|profile| profile.cry_url.as_deref())
    }
}

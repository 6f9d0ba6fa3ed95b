//! Query Screen Controller: one generic state machine per screen.
//!
//! # Design
//! The controller never performs I/O. `submit` and `refresh` hand back a
//! `Ticket` (token + request) for the host to execute; the host reports the
//! result through `settle`. Every call to `submit` mints a new token, and
//! only the latest token is allowed to settle, so the displayed result always
//! belongs to the most recently initiated request regardless of completion
//! order.
//!
//! Phase transitions:
//!
//! ```text
//! Idle|Success|Error|Loading --submit ok--> Loading --settle--> Success|Error
//!                            --submit bad-> Error
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, Outcome};
use crate::source::{required, InputPolicy, Screen, Source};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Error,
}

/// Identifies one outbound request. Monotonic per controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// A request the host must execute, tagged with the token to settle it with.
#[derive(Debug, Clone)]
pub struct Ticket {
    pub token: RequestToken,
    pub request: HttpRequest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// The outcome was applied; the controller is now in this phase.
    Applied(Phase),
    /// A newer request superseded this one; the outcome was dropped.
    Stale,
}

/// Transient view state of one screen.
///
/// `Error` implies no result; `Success` implies a result and no message.
#[derive(Debug, Clone, Serialize)]
pub struct QueryState<T> {
    phase: Phase,
    error_message: Option<String>,
    result: Option<T>,
    refreshing: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            error_message: None,
            result: None,
            refreshing: false,
        }
    }
}

impl<T> QueryState<T> {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn result(&self) -> Option<&T> {
        self.result.as_ref()
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    fn begin(&mut self, refreshing: bool) {
        self.phase = Phase::Loading;
        self.error_message = None;
        self.result = None;
        self.refreshing = refreshing;
    }

    fn succeed(&mut self, result: T) {
        self.phase = Phase::Success;
        self.error_message = None;
        self.result = Some(result);
        self.refreshing = false;
    }

    fn fail(&mut self, message: &str) {
        self.phase = Phase::Error;
        self.error_message = Some(message.to_string());
        self.result = None;
        self.refreshing = false;
    }
}

pub struct QueryController<S: Source> {
    source: S,
    state: QueryState<S::Output>,
    latest: RequestToken,
}

impl<S: Source> QueryController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            state: QueryState::default(),
            latest: RequestToken(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn state(&self) -> &QueryState<S::Output> {
        &self.state
    }

    /// Hosts should disable the trigger while this is true.
    pub fn is_loading(&self) -> bool {
        self.state.phase == Phase::Loading
    }

    /// Starts a query. Returns `None` when it failed locally (empty input,
    /// missing key, bad base URL); the state then already shows the error.
    pub fn submit(&mut self, input: Option<&str>) -> Option<Ticket> {
        self.start(input, false)
    }

    /// Re-runs a fixed-input query. Text-driven screens ignore it.
    pub fn refresh(&mut self) -> Option<Ticket> {
        if S::INPUT == InputPolicy::Required {
            debug!(screen = S::SCREEN.as_str(), "refresh ignored on text-driven screen");
            return None;
        }
        self.start(None, true)
    }

    /// Applies the host's outcome for `token`, unless a newer request has
    /// been issued since.
    pub fn settle(&mut self, token: RequestToken, outcome: Outcome) -> Settlement {
        if token != self.latest || self.state.phase != Phase::Loading {
            debug!(
                screen = S::SCREEN.as_str(),
                token = token.get(),
                latest = self.latest.get(),
                "discarding stale response"
            );
            return Settlement::Stale;
        }

        let mapped = match outcome {
            Ok(response) => {
                debug!(screen = S::SCREEN.as_str(), status = response.status, "response received");
                self.source.parse_response(response)
            }
            Err(err) => Err(ApiError::Transport(err.0)),
        };

        match mapped {
            Ok(result) => {
                debug!(screen = S::SCREEN.as_str(), token = token.get(), "query succeeded");
                self.state.succeed(result);
            }
            Err(err) => self.fail(&err),
        }
        Settlement::Applied(self.state.phase)
    }

    fn start(&mut self, input: Option<&str>, refreshing: bool) -> Option<Ticket> {
        // Minted before validation so an outstanding request goes stale even
        // when this attempt fails locally.
        self.latest = RequestToken(self.latest.0 + 1);
        let token = self.latest;

        let input = match S::INPUT {
            InputPolicy::Required => match required(input) {
                Ok(text) => Some(text),
                Err(err) => {
                    self.fail(&err);
                    return None;
                }
            },
            InputPolicy::Fixed => None,
        };

        match self.source.build_request(input) {
            Ok(request) => {
                debug!(
                    screen = S::SCREEN.as_str(),
                    token = token.get(),
                    endpoint = request.url.split('?').next().unwrap_or_default(),
                    "query started"
                );
                self.state.begin(refreshing);
                Some(Ticket { token, request })
            }
            Err(err) => {
                self.fail(&err);
                None
            }
        }
    }

    fn fail(&mut self, err: &ApiError) {
        if err.is_local() {
            debug!(screen = S::SCREEN.as_str(), "rejected locally: {err}");
        } else {
            warn!(screen = S::SCREEN.as_str(), "query failed: {err}");
        }
        self.state.fail(err.user_message(S::SCREEN));
    }
}

#[derive(Serialize)]
struct Snapshot<'a, T, D> {
    screen: Screen,
    #[serde(flatten)]
    state: &'a QueryState<T>,
    display: Option<D>,
}

/// Object-safe view of any controller, for hosts that address screens by
/// `Screen` rather than by type.
pub trait ScreenController {
    fn screen(&self) -> Screen;
    fn suggestions(&self) -> &'static [&'static str];
    fn submit(&mut self, input: Option<&str>) -> Option<Ticket>;
    fn refresh(&mut self) -> Option<Ticket>;
    fn settle(&mut self, token: RequestToken, outcome: Outcome) -> Settlement;
    fn phase(&self) -> Phase;
    fn error_message(&self) -> Option<&str>;
    fn is_refreshing(&self) -> bool;
    /// The whole state as JSON: raw `result` plus its derived `display`
    /// block, `null` outside `Success`.
    fn snapshot_json(&self) -> serde_json::Result<String>;
}

impl<S: Source> ScreenController for QueryController<S> {
    fn screen(&self) -> Screen {
        S::SCREEN
    }

    fn suggestions(&self) -> &'static [&'static str] {
        S::SUGGESTIONS
    }

    fn submit(&mut self, input: Option<&str>) -> Option<Ticket> {
        QueryController::submit(self, input)
    }

    fn refresh(&mut self) -> Option<Ticket> {
        QueryController::refresh(self)
    }

    fn settle(&mut self, token: RequestToken, outcome: Outcome) -> Settlement {
        QueryController::settle(self, token, outcome)
    }

    fn phase(&self) -> Phase {
        self.state.phase()
    }

    fn error_message(&self) -> Option<&str> {
        self.state.error_message()
    }

    fn is_refreshing(&self) -> bool {
        self.state.is_refreshing()
    }

    fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Snapshot {
            screen: S::SCREEN,
            state: &self.state,
            display: self.state.result().map(S::display),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpResponse, TransportError};
    use crate::sources::{
        AgeSource, ArticleSource, Gender, GenderSource, UniversitySource, WeatherSource,
    };

    fn ok(body: &str) -> Outcome {
        Ok(HttpResponse::new(200, body))
    }

    fn gender() -> QueryController<GenderSource> {
        QueryController::new(GenderSource::new("https://api.genderize.io"))
    }

    #[test]
    fn starts_idle() {
        let c = gender();
        assert_eq!(c.state().phase(), Phase::Idle);
        assert!(c.state().result().is_none());
        assert!(c.state().error_message().is_none());
    }

    #[test]
    fn blank_input_fails_locally_without_ticket() {
        for input in [None, Some(""), Some("   "), Some("\t\n")] {
            let mut c = gender();
            assert!(c.submit(input).is_none(), "{input:?} must not produce a request");
            assert_eq!(c.state().phase(), Phase::Error);
            assert_eq!(c.state().error_message(), Some("Por favor ingresa un nombre"));
        }
    }

    #[test]
    fn blank_input_on_every_text_screen_issues_nothing() {
        let mut universities = QueryController::new(UniversitySource::new("https://adamix.net"));
        assert!(universities.submit(Some(" ")).is_none());
        assert_eq!(universities.state().phase(), Phase::Error);

        let mut age = QueryController::new(AgeSource::new("https://api.agify.io"));
        assert!(age.submit(Some("")).is_none());
        assert_eq!(age.state().phase(), Phase::Error);
    }

    #[test]
    fn submit_enters_loading_and_clears_previous_result() {
        let mut c = gender();
        let t = c.submit(Some("ana")).unwrap();
        c.settle(t.token, ok(r#"{"name":"ana","gender":"female","probability":0.99,"count":10}"#));
        assert_eq!(c.state().phase(), Phase::Success);

        let t2 = c.submit(Some("luis")).unwrap();
        assert!(t2.token > t.token);
        assert_eq!(c.state().phase(), Phase::Loading);
        assert!(c.state().result().is_none());
        assert!(c.is_loading());
    }

    #[test]
    fn input_is_trimmed_before_building() {
        let mut c = gender();
        let t = c.submit(Some("  ana  ")).unwrap();
        assert_eq!(t.request.url, "https://api.genderize.io/?name=ana");
    }

    #[test]
    fn null_prediction_is_success() {
        let mut c = gender();
        let t = c.submit(Some("xqzt")).unwrap();
        let settled = c.settle(t.token, ok(r#"{"name":"xqzt","gender":null,"probability":0.0,"count":0}"#));
        assert_eq!(settled, Settlement::Applied(Phase::Success));
        assert_eq!(c.state().result().unwrap().gender, Gender::Unknown);
        assert!(c.state().error_message().is_none());

        let mut age = QueryController::new(AgeSource::new("https://api.agify.io"));
        let t = age.submit(Some("xqzt")).unwrap();
        age.settle(t.token, ok(r#"{"name":"xqzt","age":null,"count":0}"#));
        assert_eq!(age.state().phase(), Phase::Success);
        assert_eq!(age.state().result().unwrap().age, None);
    }

    #[test]
    fn transport_failure_shows_fixed_message() {
        let mut c = gender();
        let t = c.submit(Some("ana")).unwrap();
        let settled = c.settle(t.token, Err(TransportError::new("dns error: no such host")));
        assert_eq!(settled, Settlement::Applied(Phase::Error));
        assert_eq!(
            c.state().error_message(),
            Some("Error al conectar con el servicio. Intenta de nuevo.")
        );
        assert!(c.state().result().is_none());
    }

    #[test]
    fn malformed_body_is_an_error() {
        let mut c = gender();
        let t = c.submit(Some("ana")).unwrap();
        c.settle(t.token, ok("<html>oops</html>"));
        assert_eq!(c.state().phase(), Phase::Error);
    }

    #[test]
    fn latest_initiated_request_wins_when_completed_out_of_order() {
        let mut c = gender();
        let first = c.submit(Some("ana")).unwrap();
        let second = c.submit(Some("luis")).unwrap();

        let settled = c.settle(
            second.token,
            ok(r#"{"name":"luis","gender":"male","probability":0.99,"count":5}"#),
        );
        assert_eq!(settled, Settlement::Applied(Phase::Success));

        let settled = c.settle(
            first.token,
            ok(r#"{"name":"ana","gender":"female","probability":0.99,"count":5}"#),
        );
        assert_eq!(settled, Settlement::Stale);
        assert_eq!(c.state().result().unwrap().name, "luis");
    }

    #[test]
    fn stale_response_arriving_first_is_dropped() {
        let mut c = gender();
        let first = c.submit(Some("ana")).unwrap();
        let second = c.submit(Some("luis")).unwrap();

        assert_eq!(
            c.settle(first.token, Err(TransportError::new("timeout"))),
            Settlement::Stale
        );
        assert_eq!(c.state().phase(), Phase::Loading);

        c.settle(
            second.token,
            ok(r#"{"name":"luis","gender":"male","probability":0.9,"count":5}"#),
        );
        assert_eq!(c.state().result().unwrap().name, "luis");
    }

    #[test]
    fn local_failure_supersedes_outstanding_request() {
        let mut c = gender();
        let first = c.submit(Some("ana")).unwrap();
        assert!(c.submit(Some(" ")).is_none());
        assert_eq!(
            c.settle(first.token, ok(r#"{"name":"ana","gender":"female","probability":1.0,"count":1}"#)),
            Settlement::Stale
        );
        assert_eq!(c.state().phase(), Phase::Error);
    }

    #[test]
    fn settling_twice_is_stale() {
        let mut c = gender();
        let t = c.submit(Some("ana")).unwrap();
        let body = r#"{"name":"ana","gender":"female","probability":1.0,"count":1}"#;
        assert_eq!(c.settle(t.token, ok(body)), Settlement::Applied(Phase::Success));
        assert_eq!(c.settle(t.token, ok(body)), Settlement::Stale);
    }

    #[test]
    fn refresh_only_on_fixed_screens() {
        let mut c = gender();
        assert!(c.refresh().is_none());
        assert_eq!(c.state().phase(), Phase::Idle);

        let mut feed = QueryController::new(ArticleSource::new("https://kinsta.com"));
        let t = feed.refresh().unwrap();
        assert!(feed.state().is_refreshing());
        assert_eq!(feed.state().phase(), Phase::Loading);
        feed.settle(t.token, ok("[]"));
        assert!(!feed.state().is_refreshing());
        assert_eq!(feed.state().phase(), Phase::Success);
    }

    #[test]
    fn refresh_while_outstanding_lets_latest_win() {
        let mut feed = QueryController::new(ArticleSource::new("https://kinsta.com"));
        let mount = feed.submit(None).unwrap();
        let pull = feed.refresh().unwrap();
        let one_post = r#"[{"id":2,"date":"2024-01-01T00:00:00","link":"l","title":{"rendered":"new"},"excerpt":{"rendered":""}}]"#;
        feed.settle(pull.token, ok(one_post));
        assert_eq!(feed.settle(mount.token, ok("[]")), Settlement::Stale);
        assert_eq!(feed.state().result().unwrap()[0].title, "new");
    }

    #[test]
    fn missing_weather_key_is_reported_on_first_fetch() {
        let mut weather = QueryController::new(WeatherSource::new("https://api.weatherapi.com", None));
        assert_eq!(weather.state().phase(), Phase::Idle);
        assert!(weather.submit(None).is_none());
        assert_eq!(weather.state().phase(), Phase::Error);
        assert_eq!(
            weather.state().error_message(),
            Some("Error al obtener datos del clima. Intenta de nuevo.")
        );
    }

    #[test]
    fn snapshot_carries_screen_and_state() {
        let mut c = gender();
        let t = c.submit(Some("ana")).unwrap();
        c.settle(t.token, ok(r#"{"name":"ana","gender":"female","probability":0.5,"count":2}"#));
        let json: serde_json::Value =
            serde_json::from_str(&ScreenController::snapshot_json(&c).unwrap()).unwrap();
        assert_eq!(json["screen"], "gender");
        assert_eq!(json["phase"], "success");
        assert_eq!(json["result"]["gender"], "female");
        assert_eq!(json["display"]["label"], "Femenino");
        assert_eq!(json["display"]["probability_percent"], 50);
        assert_eq!(json["error_message"], serde_json::Value::Null);
    }

    #[test]
    fn snapshot_has_no_display_without_result() {
        let mut c = gender();
        c.submit(Some(" "));
        let json: serde_json::Value =
            serde_json::from_str(&ScreenController::snapshot_json(&c).unwrap()).unwrap();
        assert_eq!(json["phase"], "error");
        assert_eq!(json["display"], serde_json::Value::Null);
    }

    #[test]
    fn age_snapshot_carries_band_presentation() {
        let mut age = QueryController::new(AgeSource::new("https://api.agify.io"));
        let t = age.submit(Some("michael")).unwrap();
        age.settle(t.token, ok(r#"{"name":"michael","age":62,"count":10}"#));
        let json: serde_json::Value =
            serde_json::from_str(&ScreenController::snapshot_json(&age).unwrap()).unwrap();
        assert_eq!(json["display"]["band"], "elder");
        assert_eq!(json["display"]["label"], "Anciano");
        assert_eq!(json["display"]["color"], "#FF9800");
    }

    #[test]
    fn suggestions_come_from_the_source() {
        let universities = QueryController::new(UniversitySource::new("https://adamix.net"));
        assert_eq!(ScreenController::suggestions(&universities)[0], "Dominican Republic");
        assert!(ScreenController::suggestions(&gender()).is_empty());
    }
}

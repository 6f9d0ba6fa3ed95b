//! Every screen end to end against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, points an `App` at it through
//! mirrored endpoints, and plays the host: each ticket's request is executed
//! over real HTTP with ureq and the outcome is settled back into the screen.

use screens_core::sources::{AgeBand, Gender, UvLevel};
use screens_core::{
    App, Config, Endpoints, HttpRequest, HttpResponse, Outcome, Phase, Screen, Settlement, TransportError,
};

fn start_mock_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

/// Execute an `HttpRequest` using ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data, letting the core interpret them.
fn execute(req: &HttpRequest) -> Outcome {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = agent
        .get(&req.url)
        .call()
        .map_err(|e| TransportError::new(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();
    Ok(HttpResponse::new(status, body))
}

fn app_for(base: &str, weather_api_key: Option<&str>) -> App {
    App::new(Config {
        endpoints: Endpoints::mirrored(base),
        weather_api_key: weather_api_key.map(str::to_string),
    })
}

/// Submit, execute, settle. Returns the settlement, or `None` when the
/// submit failed locally.
fn query(app: &mut App, screen: Screen, input: Option<&str>) -> Option<Settlement> {
    let controller = app.controller_mut(screen);
    let ticket = controller.submit(input)?;
    let outcome = execute(&ticket.request);
    Some(controller.settle(ticket.token, outcome))
}

#[test]
fn every_screen_against_mock_server() {
    let base = start_mock_server();
    let mut app = app_for(&base, Some("test-key"));

    // Gender: known name, then a name with no prediction.
    assert_eq!(
        query(&mut app, Screen::Gender, Some("  Maria ")),
        Some(Settlement::Applied(Phase::Success))
    );
    let result = app.gender().state().result().unwrap();
    assert_eq!(result.gender, Gender::Female);
    assert_eq!(result.probability_percent(), 98);

    query(&mut app, Screen::Gender, Some("xqzt"));
    assert_eq!(app.gender().state().phase(), Phase::Success);
    assert_eq!(app.gender().state().result().unwrap().gender, Gender::Unknown);

    // Age: one name per band.
    for (name, band) in [("emma", AgeBand::Young), ("maria", AgeBand::Adult), ("michael", AgeBand::Elder)] {
        query(&mut app, Screen::Age, Some(name));
        assert_eq!(app.age().state().result().unwrap().band(), Some(band), "{name}");
    }

    // Universities.
    query(&mut app, Screen::Universities, Some("Dominican Republic"));
    let list = app.universities().state().result().unwrap();
    assert_eq!(list.country, "Dominican Republic");
    assert_eq!(list.entries.len(), 3);
    assert_eq!(list.entries[1].visit_url(), Some("https://www.intec.edu.do"));
    assert_eq!(list.entries[2].visit_url(), None);
    assert_eq!(list.entries[2].domain_label(), "No disponible");

    query(&mut app, Screen::Universities, Some("Atlantis"));
    assert_eq!(app.universities().state().phase(), Phase::Error);
    assert_eq!(
        app.universities().state().error_message(),
        Some("No se encontraron universidades para este país. Verifica que el nombre esté en inglés.")
    );

    // Weather on mount.
    query(&mut app, Screen::Weather, None);
    let weather = app.weather().state().result().unwrap();
    assert_eq!(weather.location_name, "Santo Domingo");
    assert_eq!(weather.uv_level(), UvLevel::VeryHigh);

    // Creature: case-insensitive lookup, then an unknown name.
    query(&mut app, Screen::Creature, Some("PIKACHU"));
    let profile = app.creature().state().result().unwrap();
    assert_eq!(profile.dex_number(), "#025");
    assert_eq!(profile.height_m(), 0.4);
    assert_eq!(profile.weight_kg(), 6.0);
    assert_eq!(profile.stats.len(), 6);
    assert!(app.creature_cry_url().unwrap().ends_with("/25.ogg"));

    query(&mut app, Screen::Creature, Some("missingno"));
    assert_eq!(app.creature().state().phase(), Phase::Error);
    assert_eq!(
        app.creature().state().error_message(),
        Some("Pokémon no encontrado. Verifica el nombre e intenta de nuevo.")
    );
    assert_eq!(app.creature_cry_url(), None);

    // Articles: three newest posts, embedded author and image.
    query(&mut app, Screen::Articles, None);
    let posts = app.articles().state().result().unwrap();
    assert_eq!(posts.len(), 3);
    assert_eq!(posts[0].author_name.as_deref(), Some("Ana Pérez"));
    assert!(posts[0].image_url.is_some());
    assert!(posts[1].image_url.is_none());
    assert_eq!(posts[0].published_label().as_deref(), Some("1 de mayo de 2024, 09:05"));
    assert!(posts[0].excerpt_text.ends_with("..."));
    assert_eq!(posts[0].excerpt_text.chars().count(), 153);
}

#[test]
fn refresh_refetches_fixed_screens() {
    let base = start_mock_server();
    let mut app = app_for(&base, Some("test-key"));

    query(&mut app, Screen::Articles, None);
    let ticket = app.controller_mut(Screen::Articles).refresh().unwrap();
    assert!(app.controller(Screen::Articles).is_refreshing());
    let outcome = execute(&ticket.request);
    app.controller_mut(Screen::Articles).settle(ticket.token, outcome);
    assert!(!app.controller(Screen::Articles).is_refreshing());
    assert_eq!(app.articles().state().result().unwrap().len(), 3);

    assert!(app.controller_mut(Screen::Gender).refresh().is_none());
}

#[test]
fn slower_earlier_response_is_discarded() {
    let base = start_mock_server();
    let mut app = app_for(&base, None);

    let first = app.controller_mut(Screen::Gender).submit(Some("ana")).unwrap();
    let second = app.controller_mut(Screen::Gender).submit(Some("luis")).unwrap();
    let first_outcome = execute(&first.request);
    let second_outcome = execute(&second.request);

    let controller = app.controller_mut(Screen::Gender);
    assert_eq!(
        controller.settle(second.token, second_outcome),
        Settlement::Applied(Phase::Success)
    );
    assert_eq!(controller.settle(first.token, first_outcome), Settlement::Stale);

    let result = app.gender().state().result().unwrap();
    assert_eq!(result.name, "luis");
    assert_eq!(result.gender, Gender::Male);
}

#[test]
fn weather_key_problems_surface_as_weather_error() {
    let base = start_mock_server();
    let expected = Some("Error al obtener datos del clima. Intenta de nuevo.");

    let mut app = app_for(&base, None);
    assert_eq!(query(&mut app, Screen::Weather, None), None);
    assert_eq!(app.weather().state().error_message(), expected);

    let mut app = app_for(&base, Some(mock_server::DISABLED_WEATHER_KEY));
    assert_eq!(
        query(&mut app, Screen::Weather, None),
        Some(Settlement::Applied(Phase::Error))
    );
    assert_eq!(app.weather().state().error_message(), expected);
}

#[test]
fn unreachable_host_is_a_transport_error() {
    // Bind and drop to get a port nobody listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let mut app = app_for(&format!("http://{addr}"), None);

    assert_eq!(
        query(&mut app, Screen::Age, Some("maria")),
        Some(Settlement::Applied(Phase::Error))
    );
    assert_eq!(
        app.age().state().error_message(),
        Some("Error al conectar con el servicio. Intenta de nuevo.")
    );
}

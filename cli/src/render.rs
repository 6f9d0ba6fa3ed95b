//! Plain-text rendering of each screen's state.

use screens_core::sources::UvLevel;
use screens_core::{App, Phase, Screen};

pub fn print(app: &App, screen: Screen) {
    let controller = app.controller(screen);
    match controller.phase() {
        Phase::Idle => println!("(sin consulta)"),
        Phase::Loading => println!("Cargando..."),
        Phase::Error => println!("{}", controller.error_message().unwrap_or_default()),
        Phase::Success => match screen {
            Screen::Gender => gender(app),
            Screen::Age => age(app),
            Screen::Universities => universities(app),
            Screen::Weather => weather(app),
            Screen::Creature => creature(app),
            Screen::Articles => articles(app),
        },
    }
}

fn gender(app: &App) {
    let Some(r) = app.gender().state().result() else { return };
    println!("{} {}: {}", r.gender.emoji(), r.name, r.gender.label());
    println!("Probabilidad: {}% ({} muestras)", r.probability_percent(), r.sample_count);
}

fn age(app: &App) {
    let Some(r) = app.age().state().result() else { return };
    match (r.age, r.band()) {
        (Some(age), Some(band)) => {
            println!("{} {}: {age} años", band.emoji(), r.name);
            println!("{} - {}", band.label(), band.message());
        }
        _ => println!("{}: sin datos suficientes", r.name),
    }
}

fn universities(app: &App) {
    let Some(list) = app.universities().state().result() else { return };
    println!("{} universidades en {}", list.entries.len(), list.country);
    for u in &list.entries {
        println!("- {}", u.name);
        if let Some(region) = &u.region {
            println!("  Región: {region}");
        }
        println!("  Dominio: {}", u.domain_label());
        if let Some(url) = u.visit_url() {
            println!("  Sitio: {url}");
        }
    }
}

fn weather(app: &App) {
    let Some(w) = app.weather().state().result() else { return };
    println!("{} {}, {} ({})", w.condition_icon(), w.location_name, w.country, w.local_time);
    println!("{:.0}°C / {:.0}°F, sensación {:.0}°C", w.temp_c, w.temp_f, w.feels_like_c);
    println!("{}", w.condition_text);
    println!("Humedad {}%, viento {} km/h {}", w.humidity_pct, w.wind_kph, w.wind_dir);
    let uv: UvLevel = w.uv_level();
    println!("UV {} ({})", w.uv_index, uv.label());
    println!("Presión {} mb, visibilidad {} km", w.pressure_mb, w.visibility_km);
}

fn creature(app: &App) {
    let Some(p) = app.creature().state().result() else { return };
    println!("{} {}", p.dex_number(), p.display_name());
    println!("Tipos: {}", p.types.join(", "));
    println!("Altura: {} m, peso: {} kg", p.height_m(), p.weight_kg());
    if let Some(xp) = p.base_experience {
        println!("Experiencia base: {xp}");
    }
    println!("Habilidades: {}", p.ability_labels().join(", "));
    for stat in &p.stats {
        let filled = (stat.bar_fraction() * 20.0).round() as usize;
        println!("{:<16} {:>3} {}{}", stat.label(), stat.value, "#".repeat(filled), ".".repeat(20 - filled));
    }
    if p.cry_url.is_none() {
        println!("Sonido no disponible");
    }
}

fn articles(app: &App) {
    let Some(posts) = app.articles().state().result() else { return };
    for a in posts {
        println!("{}", a.title);
        let by = a.author_name.as_deref().unwrap_or("Kinsta");
        match a.published_label() {
            Some(date) => println!("  {by} · {date}"),
            None => println!("  {by}"),
        }
        println!("  {}", a.excerpt_text);
        println!("  {}", a.link);
    }
}

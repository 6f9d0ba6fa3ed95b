//! C-ABI wrapper around `screens-core`.
//!
//! # Overview
//! Exposes the six screen controllers through `extern "C"` functions so the
//! mobile shell can drive them without linking to serde or any HTTP stack.
//! The shell executes every request itself and reports the response back.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `screens_submit` / `screens_refresh` hand out an `FfiTicket`; the host
//!   executes its request and calls `screens_settle` with the same token.
//! - Rendering reads `screens_phase`, `screens_error_message`, and the full
//!   state as JSON from `screens_state_json`.
//! - The C caller owns all returned pointers and must call the matching
//!   `screens_free_*` function to release them.

pub mod types;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::catch_unwind;

use screens_core::config::{BASE_URL_VAR, WEATHER_API_KEY_VAR};
use screens_core::{App, Config, CryPlayer, HttpResponse, PlaybackError, RequestToken, Screen, TransportError};

use types::*;

/// Decode a screen id from C. `None` for anything outside `FfiScreen`.
fn screen_arg(raw: u32) -> Option<Screen> {
    FfiScreen::try_from(raw).ok().map(Screen::from)
}

// ---------------------------------------------------------------------------
// App lifecycle
// ---------------------------------------------------------------------------

/// Create the app with all six screens idle.
///
/// `weather_api_key` may be null or empty; the weather screen then reports
/// the missing key on its first fetch. `base_url` may be null for the real
/// providers, or point at a host serving every provider under its mirrored
/// prefixes. Returns null only if an internal panic occurs. The caller must
/// free the returned pointer with `screens_app_free`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_app_new(
    weather_api_key: *const c_char,
    base_url: *const c_char,
) -> *mut FfiApp {
    catch_unwind(|| {
        let key = read_c_str(weather_api_key);
        let base = read_c_str(base_url);
        let config = Config::from_lookup(|var| match var {
            WEATHER_API_KEY_VAR => key.map(str::to_string),
            BASE_URL_VAR => base.map(str::to_string),
            _ => None,
        });
        Box::into_raw(Box::new(FfiApp {
            inner: App::new(config),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free an app created by `screens_app_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn screens_app_free(app: *mut FfiApp) {
    if !app.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(app) });
        });
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Start a query on `screen`. `input` is the user's text; pass null for the
/// weather and articles screens.
///
/// Returns null when no request was issued (empty input, missing key) or
/// when `app` is null; the screen state then already shows the error.
/// Otherwise the caller must execute the ticket's request and free it with
/// `screens_free_ticket`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_submit(
    app: *mut FfiApp,
    screen: u32,
    input: *const c_char,
) -> *mut FfiTicket {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return std::ptr::null_mut();
        };
        if app.is_null() {
            return std::ptr::null_mut();
        }
        let app = unsafe { &mut *app };
        let input = read_c_str(input);
        match app.inner.controller_mut(screen).submit(input) {
            Some(ticket) => FfiTicket::from_core(ticket),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Pull-to-refresh. Returns null on text-driven screens, which ignore it.
#[unsafe(no_mangle)]
pub extern "C" fn screens_refresh(app: *mut FfiApp, screen: u32) -> *mut FfiTicket {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return std::ptr::null_mut();
        };
        if app.is_null() {
            return std::ptr::null_mut();
        }
        let app = unsafe { &mut *app };
        match app.inner.controller_mut(screen).refresh() {
            Some(ticket) => FfiTicket::from_core(ticket),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body is
/// read as empty.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    HttpResponse::new(resp.status, read_c_str(resp.body).unwrap_or_default())
}

/// Report the outcome of the request issued with `token`.
///
/// Pass the response whatever its status code. Pass a null `response` when
/// the round-trip itself failed (no connectivity, timeout).
#[unsafe(no_mangle)]
pub extern "C" fn screens_settle(
    app: *mut FfiApp,
    screen: u32,
    token: u64,
    response: *const FfiHttpResponse,
) -> FfiSettlement {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return FfiSettlement::NullArg;
        };
        if app.is_null() {
            return FfiSettlement::NullArg;
        }
        let app = unsafe { &mut *app };
        let outcome = if response.is_null() {
            Err(TransportError::new("host reported a transport failure"))
        } else {
            Ok(ffi_response_to_core(unsafe { &*response }))
        };
        app.inner
            .controller_mut(screen)
            .settle(RequestToken::from_raw(token), outcome)
            .into()
    })
    .unwrap_or(FfiSettlement::Panic)
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

#[unsafe(no_mangle)]
pub extern "C" fn screens_phase(app: *const FfiApp, screen: u32) -> FfiPhase {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return FfiPhase::Idle;
        };
        if app.is_null() {
            return FfiPhase::Idle;
        }
        let app = unsafe { &*app };
        app.inner.controller(screen).phase().into()
    })
    .unwrap_or(FfiPhase::Idle)
}

#[unsafe(no_mangle)]
pub extern "C" fn screens_is_refreshing(app: *const FfiApp, screen: u32) -> bool {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return false;
        };
        if app.is_null() {
            return false;
        }
        let app = unsafe { &*app };
        app.inner.controller(screen).is_refreshing()
    })
    .unwrap_or(false)
}

/// The message to display in the error phase, or null when there is none.
/// Free with `screens_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_error_message(app: *const FfiApp, screen: u32) -> *mut c_char {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return std::ptr::null_mut();
        };
        if app.is_null() {
            return std::ptr::null_mut();
        }
        let app = unsafe { &*app };
        match app.inner.controller(screen).error_message() {
            Some(msg) => into_c_string(msg),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// The whole screen state as JSON (`screen`, `phase`, `error_message`,
/// `result`, `refreshing`). Free with `screens_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_state_json(app: *const FfiApp, screen: u32) -> *mut c_char {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return std::ptr::null_mut();
        };
        if app.is_null() {
            return std::ptr::null_mut();
        }
        let app = unsafe { &*app };
        match app.inner.controller(screen).snapshot_json() {
            Ok(json) => into_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Quick-pick inputs for `screen` as a JSON array of strings (empty for
/// screens without any). Null for an unknown screen. Free with
/// `screens_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_suggestions_json(app: *const FfiApp, screen: u32) -> *mut c_char {
    catch_unwind(|| {
        let Some(screen) = screen_arg(screen) else {
            return std::ptr::null_mut();
        };
        if app.is_null() {
            return std::ptr::null_mut();
        }
        let app = unsafe { &*app };
        match serde_json::to_string(app.inner.controller(screen).suggestions()) {
            Ok(json) => into_c_string(json),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Cry playback
// ---------------------------------------------------------------------------

/// Create the cry player for a creature screen. Free it with
/// `screens_cry_player_free` when the screen is torn down; that releases any
/// sound still loaded.
#[unsafe(no_mangle)]
pub extern "C" fn screens_cry_player_new(backend: FfiAudioBackend) -> *mut FfiCryPlayer {
    catch_unwind(|| {
        Box::into_raw(Box::new(FfiCryPlayer {
            inner: CryPlayer::new(backend),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Play the cry of the creature currently shown on `app`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_cry_play(player: *mut FfiCryPlayer, app: *const FfiApp) -> FfiPlayStatus {
    catch_unwind(|| {
        if player.is_null() || app.is_null() {
            return FfiPlayStatus::NullArg;
        }
        let player = unsafe { &mut *player };
        let app = unsafe { &*app };
        player.inner.play(app.inner.creature_cry_url()).into()
    })
    .unwrap_or(FfiPlayStatus::Panic)
}

/// The host reports that the clip reached its end.
#[unsafe(no_mangle)]
pub extern "C" fn screens_cry_finished(player: *mut FfiCryPlayer) {
    if !player.is_null() {
        let _ = catch_unwind(|| {
            unsafe { &mut *player }.inner.finished();
        });
    }
}

/// Whether the play control should be disabled.
#[unsafe(no_mangle)]
pub extern "C" fn screens_cry_is_playing(player: *const FfiCryPlayer) -> bool {
    catch_unwind(|| !player.is_null() && unsafe { &*player }.inner.is_playing()).unwrap_or(false)
}

/// Message for a failed `screens_cry_play`, or null for other statuses.
/// Free with `screens_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn screens_play_status_message(status: u32) -> *mut c_char {
    let err = match FfiPlayStatus::try_from(status) {
        Ok(FfiPlayStatus::Unavailable) => PlaybackError::Unavailable,
        Ok(FfiPlayStatus::Failed) => PlaybackError::Backend(String::new()),
        _ => return std::ptr::null_mut(),
    };
    into_c_string(err.user_message())
}

/// Free a player created by `screens_cry_player_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn screens_cry_player_free(player: *mut FfiCryPlayer) {
    if !player.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(player) });
        });
    }
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free a ticket returned by `screens_submit` or `screens_refresh`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn screens_free_ticket(ticket: *mut FfiTicket) {
    if ticket.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let mut ticket = unsafe { Box::from_raw(ticket) };
        ticket.request.free_fields();
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn screens_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

/// Name of `screen` as used in `screens_state_json`, or null for an
/// unknown screen. Static; do not free.
#[unsafe(no_mangle)]
pub extern "C" fn screens_screen_name(screen: u32) -> *const c_char {
    let Some(screen) = screen_arg(screen) else {
        return std::ptr::null();
    };
    let name: &'static [u8] = match screen {
        Screen::Gender => b"gender\0",
        Screen::Age => b"age\0",
        Screen::Universities => b"universities\0",
        Screen::Weather => b"weather\0",
        Screen::Creature => b"creature\0",
        Screen::Articles => b"articles\0",
    };
    name.as_ptr() as *const c_char
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

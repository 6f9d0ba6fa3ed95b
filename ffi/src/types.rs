//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::{c_void, CStr, CString};
use std::os::raw::c_char;

use screens_core::http::{HttpMethod, HttpRequest};
use screens_core::{App, AudioBackend, CryPlayer, Phase, PlaybackError, Screen, Settlement, Ticket};

/// Opaque handle to the six screen controllers. C callers receive a pointer
/// to this and pass it back into every `screens_*` function.
pub struct FfiApp {
    pub(crate) inner: App,
}

/// Opaque handle to the creature cry player.
pub struct FfiCryPlayer {
    pub(crate) inner: CryPlayer<FfiAudioBackend>,
}

/// Copy `s` into a heap C string owned by the caller. Interior NULs are
/// dropped rather than failing the whole call.
pub(crate) fn into_c_string(s: impl Into<String>) -> *mut c_char {
    let mut s: String = s.into();
    s.retain(|c| c != '\0');
    CString::new(s).unwrap_or_default().into_raw()
}

/// Borrow a caller-provided C string. Null and invalid UTF-8 read as `None`.
pub(crate) fn read_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    unsafe { CStr::from_ptr(ptr) }.to_str().ok()
}

// ---------------------------------------------------------------------------
// Screens and phases
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiScreen {
    Gender = 0,
    Age = 1,
    Universities = 2,
    Weather = 3,
    Creature = 4,
    Articles = 5,
}

/// C passes screens as plain integers; anything outside `0..=5` is rejected
/// here instead of being read as an enum.
impl TryFrom<u32> for FfiScreen {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, u32> {
        match raw {
            0 => Ok(FfiScreen::Gender),
            1 => Ok(FfiScreen::Age),
            2 => Ok(FfiScreen::Universities),
            3 => Ok(FfiScreen::Weather),
            4 => Ok(FfiScreen::Creature),
            5 => Ok(FfiScreen::Articles),
            other => Err(other),
        }
    }
}

impl From<FfiScreen> for Screen {
    fn from(s: FfiScreen) -> Self {
        match s {
            FfiScreen::Gender => Screen::Gender,
            FfiScreen::Age => Screen::Age,
            FfiScreen::Universities => Screen::Universities,
            FfiScreen::Weather => Screen::Weather,
            FfiScreen::Creature => Screen::Creature,
            FfiScreen::Articles => Screen::Articles,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiPhase {
    Idle = 0,
    Loading = 1,
    Success = 2,
    Error = 3,
}

impl From<Phase> for FfiPhase {
    fn from(p: Phase) -> Self {
        match p {
            Phase::Idle => FfiPhase::Idle,
            Phase::Loading => FfiPhase::Loading,
            Phase::Success => FfiPhase::Success,
            Phase::Error => FfiPhase::Error,
        }
    }
}

/// What `screens_settle` did with the host's outcome.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiSettlement {
    /// Applied; the screen now shows a result.
    Success = 0,
    /// Applied; the screen now shows its error message.
    Error = 1,
    /// A newer request owns the screen; the outcome was dropped.
    Stale = 2,
    NullArg = 3,
    Panic = 4,
}

impl From<Settlement> for FfiSettlement {
    fn from(s: Settlement) -> Self {
        match s {
            Settlement::Applied(Phase::Success) => FfiSettlement::Success,
            Settlement::Applied(_) => FfiSettlement::Error,
            Settlement::Stale => FfiSettlement::Stale,
        }
    }
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data. `url` is fully
/// qualified, query string included.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    pub(crate) fn from_core(req: HttpRequest) -> Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: into_c_string(k),
                    value: into_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        FfiHttpRequest {
            method: req.method.into(),
            url: into_c_string(req.url),
            headers,
            headers_len,
        }
    }

    /// Release the strings and header array (not the struct itself).
    pub(crate) fn free_fields(&mut self) {
        if !self.url.is_null() {
            drop(unsafe { CString::from_raw(self.url) });
            self.url = std::ptr::null_mut();
        }
        if !self.headers.is_null() && self.headers_len > 0 {
            let slice = std::ptr::slice_from_raw_parts_mut(self.headers, self.headers_len as usize);
            let headers = unsafe { Box::from_raw(slice) };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
            self.headers = std::ptr::null_mut();
            self.headers_len = 0;
        }
    }
}

/// A request to execute plus the token to settle it with.
///
/// Returned by `screens_submit` / `screens_refresh`; release with
/// `screens_free_ticket`.
#[repr(C)]
pub struct FfiTicket {
    pub token: u64,
    pub request: FfiHttpRequest,
}

impl FfiTicket {
    pub(crate) fn from_core(ticket: Ticket) -> *mut Self {
        Box::into_raw(Box::new(FfiTicket {
            token: ticket.token.get(),
            request: FfiHttpRequest::from_core(ticket.request),
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing a request,
/// whatever the status code, then passes a pointer to `screens_settle`. The
/// FFI layer reads but does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Audio
// ---------------------------------------------------------------------------

/// Host audio engine, as callbacks.
///
/// `load` returns a non-zero handle, or 0 on failure. `play` returns false on
/// failure. `unload` must release the handle. `user_data` is passed back
/// untouched.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct FfiAudioBackend {
    pub user_data: *mut c_void,
    pub load: Option<extern "C" fn(user_data: *mut c_void, url: *const c_char) -> u64>,
    pub play: Option<extern "C" fn(user_data: *mut c_void, sound: u64) -> bool>,
    pub unload: Option<extern "C" fn(user_data: *mut c_void, sound: u64)>,
}

impl AudioBackend for FfiAudioBackend {
    type Sound = u64;

    fn load(&mut self, url: &str) -> Result<u64, PlaybackError> {
        let load = self
            .load
            .ok_or_else(|| PlaybackError::Backend("no load callback".into()))?;
        let url = CString::new(url).map_err(|e| PlaybackError::Backend(e.to_string()))?;
        match load(self.user_data, url.as_ptr()) {
            0 => Err(PlaybackError::Backend("host failed to load sound".into())),
            handle => Ok(handle),
        }
    }

    fn play(&mut self, sound: &mut u64) -> Result<(), PlaybackError> {
        let play = self
            .play
            .ok_or_else(|| PlaybackError::Backend("no play callback".into()))?;
        if play(self.user_data, *sound) {
            Ok(())
        } else {
            Err(PlaybackError::Backend("host failed to play sound".into()))
        }
    }

    fn unload(&mut self, sound: u64) {
        if let Some(unload) = self.unload {
            unload(self.user_data, sound);
        }
    }
}

/// Result of `screens_cry_play`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiPlayStatus {
    Playing = 0,
    /// The creature on screen has no cry.
    Unavailable = 1,
    /// The host engine failed to load or play the clip.
    Failed = 2,
    NullArg = 3,
    Panic = 4,
}

impl TryFrom<u32> for FfiPlayStatus {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, u32> {
        match raw {
            0 => Ok(FfiPlayStatus::Playing),
            1 => Ok(FfiPlayStatus::Unavailable),
            2 => Ok(FfiPlayStatus::Failed),
            3 => Ok(FfiPlayStatus::NullArg),
            4 => Ok(FfiPlayStatus::Panic),
            other => Err(other),
        }
    }
}

impl From<Result<(), PlaybackError>> for FfiPlayStatus {
    fn from(r: Result<(), PlaybackError>) -> Self {
        match r {
            Ok(()) => FfiPlayStatus::Playing,
            Err(PlaybackError::Unavailable) => FfiPlayStatus::Unavailable,
            Err(PlaybackError::Backend(_)) => FfiPlayStatus::Failed,
        }
    }
}

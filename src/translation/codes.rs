//! Backend return codes.
//!
//! The procedures are mid-migration between two conventions: the legacy
//! numeric codes (0 / 1 / 202 / 404) and HTTP-style codes (200 / 204 / 400).
//! Both are accepted side by side.

/// A backend status code, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnCode {
    /// `0`: no matching record.
    NoRecord,
    /// `1`: success, legacy numeric convention.
    Found,
    /// `200`
    Ok,
    /// `202`: success, legacy transitional code.
    Accepted,
    /// `204`
    NoContent,
    /// `400`
    BadRequest,
    /// `404`: not found, legacy HTTP-style code.
    NotFound,
    /// `503`: produced by the fallback.
    ServiceUnavailable,
    /// Anything else.
    Unrecognized(i64),
}

impl From<i64> for ReturnCode {
    fn from(code: i64) -> Self {
        match code {
            0 => ReturnCode::NoRecord,
            1 => ReturnCode::Found,
            200 => ReturnCode::Ok,
            202 => ReturnCode::Accepted,
            204 => ReturnCode::NoContent,
            400 => ReturnCode::BadRequest,
            404 => ReturnCode::NotFound,
            503 => ReturnCode::ServiceUnavailable,
            other => ReturnCode::Unrecognized(other),
        }
    }
}

impl ReturnCode {
    /// True for codes kept only for the older procedure convention.
    pub fn is_legacy(&self) -> bool {
        matches!(self, ReturnCode::Accepted | ReturnCode::NotFound)
    }
}

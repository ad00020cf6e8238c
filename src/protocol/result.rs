//! Negotiation outcome.
//!
//! A request either yields the capability (`Available`) or one of three
//! expected unavailability reasons. These are data, not errors: every
//! caller is expected to branch on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Why a requested capability is not available.
///
/// The string forms are part of the cross-release contract and must never
/// change spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnavailabilityReason {
    /// Provider present but too old to know the descriptor.
    VersionUnknown,
    /// Provider present but has retired the descriptor.
    VersionRemoved,
    /// Provider absent or could not be activated.
    ExtensionNotAvailable,
}

impl UnavailabilityReason {
    pub const ALL: [UnavailabilityReason; 3] = [
        UnavailabilityReason::VersionUnknown,
        UnavailabilityReason::VersionRemoved,
        UnavailabilityReason::ExtensionNotAvailable,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UnavailabilityReason::VersionUnknown => "version-unknown",
            UnavailabilityReason::VersionRemoved => "version-removed",
            UnavailabilityReason::ExtensionNotAvailable => "extension-not-available",
        }
    }
}

impl fmt::Display for UnavailabilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unrecognized reason code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown unavailability reason '{0}'")]
pub struct UnknownReason(pub String);

impl FromStr for UnavailabilityReason {
    type Err = UnknownReason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownReason(s.to_string()))
    }
}

/// Outcome of a capability request.
///
/// `api` is only reachable through the `Available` variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiResult<T> {
    Available { api: T },
    Unavailable { reason: UnavailabilityReason },
}

impl<T> ApiResult<T> {
    pub fn available(api: T) -> Self {
        ApiResult::Available { api }
    }

    pub fn unavailable(reason: UnavailabilityReason) -> Self {
        ApiResult::Unavailable { reason }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ApiResult::Available { .. })
    }

    pub fn api(&self) -> Option<&T> {
        match self {
            ApiResult::Available { api } => Some(api),
            ApiResult::Unavailable { .. } => None,
        }
    }

    pub fn into_api(self) -> Option<T> {
        match self {
            ApiResult::Available { api } => Some(api),
            ApiResult::Unavailable { .. } => None,
        }
    }

    pub fn reason(&self) -> Option<UnavailabilityReason> {
        match self {
            ApiResult::Available { .. } => None,
            ApiResult::Unavailable { reason } => Some(*reason),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResult<U> {
        match self {
            ApiResult::Available { api } => ApiResult::Available { api: f(api) },
            ApiResult::Unavailable { reason } => ApiResult::Unavailable { reason },
        }
    }

    pub fn into_result(self) -> Result<T, UnavailabilityReason> {
        match self {
            ApiResult::Available { api } => Ok(api),
            ApiResult::Unavailable { reason } => Err(reason),
        }
    }
}

impl<T> From<UnavailabilityReason> for ApiResult<T> {
    fn from(reason: UnavailabilityReason) -> Self {
        ApiResult::Unavailable { reason }
    }
}

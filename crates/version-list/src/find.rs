use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FindError;

/// Determines how a lookup resolves when the requested version is absent.
///
/// Ordinals are stable and may be persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i8)]
pub enum Find {
    /// The item at exactly the given version, if any.
    Exact = 0,
    /// The nearest item whose version is strictly less than the given
    /// version. In a time-series list this is the version that was valid
    /// before the given time.
    Prev = 1,
    /// The nearest item whose version is strictly greater than the given
    /// version. In a time-series list this is the version that replaced the
    /// one current at the given time.
    Next = 2,
    /// The nearest item whose version is less than or equal to the given
    /// version. In a time-series list this is the version current at the
    /// given time.
    Upto = 3,
    /// `Upto` when such an item exists, otherwise `Next`.
    Nearest = 4,
}

impl Find {
    pub const ALL: [Find; 5] = [
        Find::Exact,
        Find::Prev,
        Find::Next,
        Find::Upto,
        Find::Nearest,
    ];

    pub fn as_i8(self) -> i8 {
        self as i8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Find::Exact => "exact",
            Find::Prev => "prev",
            Find::Next => "next",
            Find::Upto => "upto",
            Find::Nearest => "nearest",
        }
    }
}

impl TryFrom<i8> for Find {
    type Error = FindError;

    fn try_from(v: i8) -> Result<Self, Self::Error> {
        Find::ALL
            .into_iter()
            .find(|f| f.as_i8() == v)
            .ok_or(FindError::UnknownOrdinal(v))
    }
}

impl FromStr for Find {
    type Err = FindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Find::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FindError::UnknownName(s.to_string()))
    }
}

impl fmt::Display for Find {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Account authority. Stored as `SMALLINT`: 0 is ordinary, anything above is moderator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    #[default]
    Ordinary,
    Moderator,
}

impl Authority {
    #[inline]
    pub const fn level(&self) -> i16 {
        match self {
            Authority::Ordinary => 0,
            Authority::Moderator => 1,
        }
    }

    #[inline]
    pub const fn from_level(level: i16) -> Self {
        if level > 0 {
            Authority::Moderator
        } else {
            Authority::Ordinary
        }
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            Authority::Ordinary => "ordinary",
            Authority::Moderator => "moderator",
        }
    }

    #[inline]
    pub const fn is_moderator(&self) -> bool {
        matches!(self, Authority::Moderator)
    }
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

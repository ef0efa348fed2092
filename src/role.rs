use std::fmt;

/// Account role as reported in the `role` field of player info.
/// Code 3 is not assigned by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Normal,
    Developer,
    Guard,
    TeamMember,
    Tester,
}

impl Role {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Normal),
            1 => Some(Self::Developer),
            2 => Some(Self::Guard),
            4 => Some(Self::TeamMember),
            5 => Some(Self::Tester),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Normal => 0,
            Self::Developer => 1,
            Self::Guard => 2,
            Self::TeamMember => 4,
            Self::Tester => 5,
        }
    }

    /// Human-readable name, e.g. `"team member"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Developer => "developer",
            Self::Guard => "guard",
            Self::TeamMember => "team member",
            Self::Tester => "tester",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

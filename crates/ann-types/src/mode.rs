use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Reconciliation policy applied when a request meets an existing record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The request becomes the full content of the record.
    #[default]
    Replace,
    /// The request summary is appended to the stored summary.
    Append,
    /// Content fields are cleared; the record itself stays in place.
    Delete,
}

impl Mode {
    /// All modes in their wire order.
    pub const ALL: [Mode; 3] = [Mode::Replace, Mode::Append, Mode::Delete];

    /// Lenient parse used at the command boundary.
    ///
    /// Anything other than the three accepted spellings, including the empty
    /// string, becomes [`Mode::Replace`].
    ///
    /// ```
    /// use ann_types::Mode;
    ///
    /// assert_eq!(Mode::normalize("append"), Mode::Append);
    /// assert_eq!(Mode::normalize(""), Mode::Replace);
    /// assert_eq!(Mode::normalize("APPEND"), Mode::Replace);
    /// ```
    pub fn normalize(raw: &str) -> Self {
        raw.parse().unwrap_or_default()
    }

    /// The lowercase wire spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Replace => "replace",
            Mode::Append => "append",
            Mode::Delete => "delete",
        }
    }
}

impl FromStr for Mode {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(Mode::Replace),
            "append" => Ok(Mode::Append),
            "delete" => Ok(Mode::Delete),
            other => Err(TypeError::UnknownMode(other.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use serde::{Deserialize, Serialize};

/// Where the daily `Return` of a record comes from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ReturnSource {
    /// Use the pre-computed `Return` column of the input file.
    #[default]
    Column,
    /// Recompute the return from adjusted close prices.
    Derive,
}

impl ReturnSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReturnSource::Column => "column",
            ReturnSource::Derive => "derive",
        }
    }
}

use serde::Serialize;

/// One league year, identified by the ending year of its `YYYY-YYYY` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    pub id: u32,
    pub years: String,
    pub playoffs: bool,
}

impl Season {
    /// Build a season from a `YYYY-YYYY` label such as `2014-2015`.
    pub fn from_label(years: &str, playoffs: bool) -> Option<Self> {
        let (start, end) = years.split_once('-')?;
        let start: u32 = start.parse().ok()?;
        let id: u32 = end.parse().ok()?;
        (id == start + 1).then(|| Season {
            id,
            years: years.to_string(),
            playoffs,
        })
    }

    /// The `YYYY-YYYY` label for a season id.
    pub fn label_for(id: u32) -> String {
        format!("{}-{}", id - 1, id)
    }
}

/// A team as listed in a season's team selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub season: String,
}

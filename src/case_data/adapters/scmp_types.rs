// Source: https://interactive-static.scmp.com/sheet/wuhan/viruscases.json
#[derive(Debug, serde::Deserialize)]
pub struct ScmpCases {
    pub last_updated: String, // e.g. "2020-03-29T00:50:02.918Z"
    pub entries: Vec<ScmpEntry>,
}

// Counts arrive as comma-grouped strings, e.g. "81,000"
#[derive(Debug, serde::Deserialize)]
pub struct ScmpEntry {
    #[serde(default)]
    pub continent: Option<String>,
    pub country: String,
    pub cases: String,
    pub deaths: String,
    pub recovered: String,
    #[serde(default)]
    pub lastupdated: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    // we ignore the other fields for now
}

// Source: https://www.bing.com/covid/data
// The document root is itself the global area; `areas` holds the countries.
#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingCases {
    pub last_updated: String,
    pub areas: Vec<BingArea>,
}

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BingArea {
    #[serde(default)]
    pub id: Option<String>,
    pub display_name: String,     // country
    pub total_confirmed: i64,     // cases
    #[serde(default)]
    pub total_deaths: Option<i64>, // deaths, absent => 0
    #[serde(default)]
    pub total_recovered: Option<i64>, // recovered, absent => 0
    #[serde(default)]
    pub last_updated: Option<String>,
    // we ignore the other fields for now
}

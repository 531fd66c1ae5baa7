use std::fmt;
use std::str::FromStr;

// One country's counts as produced by either feed
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CanonicalRecord {
    pub country: String, // display name, kept as the feed spelled it
    pub cases: f64,
    pub deaths: f64,
    pub recovered: f64,
}

impl CanonicalRecord {
    pub fn new(country: impl Into<String>, cases: f64, deaths: f64, recovered: f64) -> Self {
        Self { country: country.into(), cases, deaths, recovered }
    }
}

// Field-wise sums over one record set
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AggregateTotals {
    pub cases: f64,
    pub deaths: f64,
    pub recovered: f64,
}

impl AggregateTotals {
    pub fn add(&mut self, record: &CanonicalRecord) {
        self.cases += record.cases;
        self.deaths += record.deaths;
        self.recovered += record.recovered;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Country,   // ascending by name
    Cases,     // descending
    Deaths,    // descending
    Recovered, // descending
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Country, SortKey::Cases, SortKey::Deaths, SortKey::Recovered];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Country => "country",
            SortKey::Cases => "cases",
            SortKey::Deaths => "deaths",
            SortKey::Recovered => "recovered",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0} (expected country, cases, deaths or recovered)")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "country" => Ok(SortKey::Country),
            "cases" => Ok(SortKey::Cases),
            "deaths" => Ok(SortKey::Deaths),
            "recovered" => Ok(SortKey::Recovered),
            other => Err(UnknownSortKey(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_parse() {
        assert_eq!("Cases".parse::<SortKey>(), Ok(SortKey::Cases));
        assert_eq!(" recovered ".parse::<SortKey>(), Ok(SortKey::Recovered));
        assert!("population".parse::<SortKey>().is_err());
        for key in SortKey::ALL {
            assert_eq!(key.to_string().parse::<SortKey>(), Ok(key));
        }
    }

    #[test]
    fn test_totals_add() {
        let mut totals = AggregateTotals::default();
        totals.add(&CanonicalRecord::new("China", 81_000.0, 3_200.0, 70_000.0));
        totals.add(&CanonicalRecord::new("France", 5_000.0, 0.0, 0.0));
        assert_eq!(totals, AggregateTotals { cases: 86_000.0, deaths: 3_200.0, recovered: 70_000.0 });
    }
}

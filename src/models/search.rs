use std::path::PathBuf;

use chrono::NaiveDate;

use super::{ProjectDetails, DATE_FORMAT};

/// What older callers received instead of an empty result list.
pub const NO_MATCHES: &str = "No matching projects found";

/// Filters for [`crate::repository::ProjectRepository::search_projects`].
///
/// All filters are optional; an empty query matches every project.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against the directory name,
    /// creation date, difficulty, technologies and tags.
    pub keyword: Option<String>,
    /// Inclusive lower bound on the creation date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the creation date.
    pub end_date: Option<NaiveDate>,
    /// Search this directory instead of the configured root.
    pub root: Option<PathBuf>,
}

impl SearchQuery {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Default::default()
        }
    }

    /// Parse a `YYYY-MM-DD` bound.
    pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
        NaiveDate::parse_from_str(s, DATE_FORMAT)
    }

    /// Whether the project in directory `dir_name` passes every filter.
    pub fn matches(&self, dir_name: &str, details: &ProjectDetails) -> bool {
        self.matches_keyword(dir_name, details) && self.matches_dates(details)
    }

    fn matches_keyword(&self, dir_name: &str, details: &ProjectDetails) -> bool {
        let Some(keyword) = &self.keyword else {
            return true;
        };
        let needle = keyword.to_lowercase();
        let hit = |haystack: &str| haystack.to_lowercase().contains(&needle);

        hit(dir_name)
            || hit(&details.created_on)
            || hit(&details.difficulty)
            || details.technologies.iter().any(|t| hit(t))
            || details.tags.iter().any(|t| hit(t))
    }

    // A record without a readable date is not excluded by either bound.
    fn matches_dates(&self, details: &ProjectDetails) -> bool {
        let Some(created) = details.created_on_date() else {
            return true;
        };
        self.start_date.map_or(true, |start| created >= start)
            && self.end_date.map_or(true, |end| created <= end)
    }
}

/// Names of the matching project directories, in directory listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults {
    names: Vec<String>,
}

impl SearchResults {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The names, or `["No matching projects found"]` when there are none.
    ///
    /// Compatibility shim for consumers of the old list-only interface.
    pub fn into_legacy_list(self) -> Vec<String> {
        if self.names.is_empty() {
            vec![NO_MATCHES.to_string()]
        } else {
            self.names
        }
    }
}

impl IntoIterator for SearchResults {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        SearchQuery::parse_date(s).unwrap()
    }

    fn details() -> ProjectDetails {
        let mut details = ProjectDetails::new("Tracker", date("2024-05-20"));
        details.technologies = vec!["Rust".to_string(), "SQLite".to_string()];
        details.tags = vec!["cli".to_string()];
        details.difficulty = "Hard".to_string();
        details
    }

    #[test]
    fn test_empty_query_matches() {
        assert!(SearchQuery::default().matches("Tracker", &details()));
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let details = details();
        assert!(SearchQuery::keyword("rust").matches("Tracker", &details));
        assert!(SearchQuery::keyword("SQLITE").matches("Tracker", &details));
        assert!(SearchQuery::keyword("CLI").matches("Tracker", &details));
        assert!(SearchQuery::keyword("hard").matches("Tracker", &details));
        assert!(SearchQuery::keyword("2024-05").matches("Tracker", &details));
        assert!(SearchQuery::keyword("track").matches("Tracker", &details));
        assert!(!SearchQuery::keyword("python").matches("Tracker", &details));
    }

    #[test]
    fn test_keyword_uses_directory_name() {
        let details = details();
        assert!(SearchQuery::keyword("renamed").matches("Renamed", &details));
        assert!(!SearchQuery::keyword("tracker").matches("Renamed", &details));
    }

    #[test]
    fn test_summary_is_not_searched() {
        let mut details = details();
        details.summary = "a python port".to_string();
        assert!(!SearchQuery::keyword("python").matches("Tracker", &details));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let details = details();
        let query = SearchQuery {
            start_date: Some(date("2024-05-20")),
            end_date: Some(date("2024-05-20")),
            ..Default::default()
        };
        assert!(query.matches("Tracker", &details));

        let later = SearchQuery {
            start_date: Some(date("2024-05-21")),
            ..Default::default()
        };
        assert!(!later.matches("Tracker", &details));

        let earlier = SearchQuery {
            end_date: Some(date("2024-05-19")),
            ..Default::default()
        };
        assert!(!earlier.matches("Tracker", &details));
    }

    #[test]
    fn test_unreadable_date_passes_bounds() {
        let mut details = details();
        details.created_on = "someday".to_string();
        let query = SearchQuery {
            start_date: Some(date("2030-01-01")),
            end_date: Some(date("2000-01-01")),
            ..Default::default()
        };
        assert!(query.matches("Tracker", &details));
    }

    #[test]
    fn test_parse_date_rejects_other_formats() {
        assert!(SearchQuery::parse_date("20/05/2024").is_err());
        assert!(SearchQuery::parse_date("2024-13-01").is_err());
    }

    #[test]
    fn test_legacy_list() {
        assert_eq!(
            SearchResults::default().into_legacy_list(),
            vec!["No matching projects found"]
        );
        assert_eq!(
            SearchResults::new(vec!["Foo".to_string()]).into_legacy_list(),
            vec!["Foo"]
        );
    }
}

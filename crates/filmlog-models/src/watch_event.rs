use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::metadata::MovieMetadata;

/// Layout of `watchedDate` values in the feed
pub const WATCHED_DATE_FORMAT: &str = "%Y-%m-%d";

/// One logged watch of a movie, as persisted in the store
///
/// Created once per feed `guid` and never updated afterwards. Feed-derived fields are
/// always present; `metadata` is only populated when the entry carried a TMDB id and
/// enrichment succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovieWatchEvent {
    /// Assigned by the store on insert; `None` while the event is still a draft
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub guid: String,
    pub title: String,
    pub year: String,
    pub watched_date: Option<NaiveDate>,
    /// Empty string means "unrated"
    pub member_rating: String,
    pub description: String,
    pub tmdb_id: Option<String>,
    #[serde(flatten)]
    pub metadata: MovieMetadata,
}

impl MovieWatchEvent {
    /// Create a draft with feed-derived fields only
    pub fn draft(guid: impl Into<String>, title: impl Into<String>, year: impl Into<String>) -> Self {
        Self {
            id: None,
            guid: guid.into(),
            title: title.into(),
            year: year.into(),
            watched_date: None,
            member_rating: String::new(),
            description: String::new(),
            tmdb_id: None,
            metadata: MovieMetadata::default(),
        }
    }

    /// Parse a `YYYY-MM-DD` watched date. Empty input means "no date recorded".
    pub fn parse_watched_date(value: &str) -> Result<Option<NaiveDate>, chrono::ParseError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(value, WATCHED_DATE_FORMAT).map(Some)
    }

    /// The member rating as a number. `Ok(None)` when unrated, `Err` when the text is not a number.
    pub fn parsed_member_rating(&self) -> Result<Option<f32>, std::num::ParseFloatError> {
        if self.member_rating.is_empty() {
            return Ok(None);
        }
        self.member_rating.parse().map(Some)
    }

    /// Whether this event should be sent through enrichment
    pub fn wants_enrichment(&self) -> bool {
        self.tmdb_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    pub fn with_metadata(mut self, metadata: MovieMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_watched_date() {
        assert_eq!(
            MovieWatchEvent::parse_watched_date("2024-03-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(MovieWatchEvent::parse_watched_date("").unwrap(), None);
        assert_eq!(MovieWatchEvent::parse_watched_date("   ").unwrap(), None);
        assert!(MovieWatchEvent::parse_watched_date("15/03/2024").is_err());
    }

    #[test]
    fn test_parsed_member_rating() {
        let mut event = MovieWatchEvent::draft("letterboxd-watch-1", "Aftersun", "2022");
        assert_eq!(event.parsed_member_rating().unwrap(), None);

        event.member_rating = "4.5".to_string();
        assert_eq!(event.parsed_member_rating().unwrap(), Some(4.5));

        event.member_rating = "four".to_string();
        assert!(event.parsed_member_rating().is_err());
    }

    #[test]
    fn test_wants_enrichment() {
        let mut event = MovieWatchEvent::draft("letterboxd-watch-1", "Aftersun", "2022");
        assert!(!event.wants_enrichment());

        event.tmdb_id = Some(String::new());
        assert!(!event.wants_enrichment());

        event.tmdb_id = Some("965150".to_string());
        assert!(event.wants_enrichment());
    }

    #[test]
    fn test_serializes_flat_camel_case() {
        let mut event = MovieWatchEvent::draft("letterboxd-watch-1", "Aftersun", "2022");
        event.watched_date = NaiveDate::from_ymd_opt(2024, 3, 15);
        event.metadata.genre = "Drama".to_string();

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["guid"], "letterboxd-watch-1");
        assert_eq!(json["watchedDate"], "2024-03-15");
        assert_eq!(json["memberRating"], "");
        assert_eq!(json["genre"], "Drama");
        assert!(json.get("id").is_none());
        assert!(json.get("metadata").is_none());
    }

    #[test]
    fn test_json_keys_match_frontend_record() {
        let mut event = MovieWatchEvent::draft("letterboxd-watch-1", "Aftersun", "2022");
        event.id = Some(7);
        event.tmdb_id = Some("965150".to_string());
        event.metadata.poster_path = "/p.jpg".to_string();
        event.metadata.backdrop_path = "/b.jpg".to_string();
        event.metadata.rating = "7.8".to_string();
        event.metadata.original_language = "en".to_string();
        event.metadata.production_companies = "BBC Film".to_string();
        event.metadata.spoken_languages = "English, Türkçe".to_string();
        event.metadata.release_date = NaiveDate::from_ymd_opt(2022, 10, 21);

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["poster_path"], "/p.jpg");
        assert_eq!(json["backdrop_path"], "/b.jpg");
        assert_eq!(json["imdbRating"], "7.8");
        assert_eq!(json["original_language"], "en");
        assert_eq!(json["production_companies"], "BBC Film");
        assert_eq!(json["spoken_languages"], "English, Türkçe");
        assert_eq!(json["releaseDate"], "2022-10-21");
        assert_eq!(json["tmdbId"], "965150");
        assert_eq!(json["id"], 7);

        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        for camel in ["posterPath", "backdropPath", "rating", "originalLanguage", "productionCompanies", "spokenLanguages"] {
            assert!(!keys.contains(&camel), "unexpected key {camel}");
        }

        let back: MovieWatchEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}

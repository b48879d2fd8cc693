use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/original";

/// External metadata merged into a watch event after enrichment
///
/// JSON keys follow the record layout the web frontend reads: camelCase, except the
/// TMDB-style snake_case artwork and language fields and `imdbRating`.
///
/// Every field defaults to empty/zero. An event that was never enriched (no TMDB id,
/// or the enrichment call failed) carries `MovieMetadata::default()`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovieMetadata {
    pub plot: String,
    /// Genre names joined with ", " in API order
    pub genre: String,
    /// Directors joined with ", " in API order
    pub director: String,
    /// TMDB vote average rendered with one decimal (e.g. "7.3")
    #[serde(rename = "imdbRating")]
    pub rating: String,
    /// Runtime in minutes
    pub runtime: i32,
    pub release_date: Option<NaiveDate>,
    pub budget: i64,
    pub revenue: i64,
    pub tagline: String,
    pub status: String,
    #[serde(rename = "original_language")]
    pub original_language: String,
    #[serde(rename = "production_companies")]
    pub production_companies: String,
    #[serde(rename = "spoken_languages")]
    pub spoken_languages: String,
    #[serde(rename = "poster_path")]
    pub poster_path: String,
    #[serde(rename = "backdrop_path")]
    pub backdrop_path: String,
    pub homepage: String,
}

impl MovieMetadata {
    /// Check if no field was ever populated
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Full poster URL, if a poster path is known
    pub fn poster_url(&self) -> Option<String> {
        image_url(POSTER_BASE_URL, &self.poster_path)
    }

    /// Full backdrop URL, if a backdrop path is known
    pub fn backdrop_url(&self) -> Option<String> {
        image_url(BACKDROP_BASE_URL, &self.backdrop_path)
    }

    /// Parse the rendered rating back into a number. Empty means "no rating".
    pub fn parsed_rating(&self) -> Result<Option<f32>, std::num::ParseFloatError> {
        if self.rating.is_empty() {
            return Ok(None);
        }
        self.rating.parse().map(Some)
    }
}

fn image_url(base: &str, path: &str) -> Option<String> {
    if path.is_empty() {
        None
    } else {
        Some(format!("{}{}", base, path))
    }
}

//! Maps raw feed entries onto watch-event drafts.

use filmlog_models::MovieWatchEvent;
use thiserror::Error;
use tracing::{debug, warn};

use crate::feed::RawFeedEntry;

/// Namespace carrying the diary fields (title, year, watch date, rating)
pub const LETTERBOXD_NAMESPACE: &str = "letterboxd";
/// Namespace carrying the external movie id
pub const TMDB_NAMESPACE: &str = "tmdb";

const FILM_TITLE: &str = "filmTitle";
const FILM_YEAR: &str = "filmYear";
const WATCHED_DATE: &str = "watchedDate";
const MEMBER_RATING: &str = "memberRating";
const MOVIE_ID: &str = "movieId";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("entry has no guid")]
    MissingGuid,

    #[error("entry {guid} has no `{namespace}` extension block")]
    MissingExtension { guid: String, namespace: &'static str },

    #[error("entry {guid} is missing required field `{namespace}:{field}`")]
    MissingField {
        guid: String,
        namespace: &'static str,
        field: &'static str,
    },
}

/// Build a draft event from one feed entry. Performs no I/O.
///
/// Lists, reviews without a diary block, and other non-watch items fail with
/// [`ExtractError`] and are meant to be skipped by the caller.
pub fn extract_entry(entry: &RawFeedEntry) -> Result<MovieWatchEvent, ExtractError> {
    let guid = entry.guid.trim();
    if guid.is_empty() {
        return Err(ExtractError::MissingGuid);
    }

    if !entry.has_extension(LETTERBOXD_NAMESPACE) {
        return Err(ExtractError::MissingExtension {
            guid: guid.to_string(),
            namespace: LETTERBOXD_NAMESPACE,
        });
    }

    let required = |field: &'static str| {
        entry
            .extension(LETTERBOXD_NAMESPACE, field)
            .ok_or_else(|| ExtractError::MissingField {
                guid: guid.to_string(),
                namespace: LETTERBOXD_NAMESPACE,
                field,
            })
    };

    let title = required(FILM_TITLE)?;
    let year = required(FILM_YEAR)?;

    let mut event = MovieWatchEvent::draft(guid, title, year);
    event.description = entry.description.clone();

    match entry.extension(LETTERBOXD_NAMESPACE, WATCHED_DATE) {
        Some(raw) => match MovieWatchEvent::parse_watched_date(raw) {
            Ok(date) => event.watched_date = date,
            Err(e) => warn!(guid, value = raw, error = %e, "Unparseable watchedDate, storing as unset"),
        },
        None => debug!(guid, "watchedDate not found"),
    }

    match entry.extension(LETTERBOXD_NAMESPACE, MEMBER_RATING) {
        Some(rating) => event.member_rating = rating.to_string(),
        None => debug!(guid, "memberRating not found"),
    }

    event.tmdb_id = entry
        .extension(TMDB_NAMESPACE, MOVIE_ID)
        .map(|id| id.to_string());

    Ok(event)
}

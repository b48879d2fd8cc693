use chrono::NaiveDate;
use filmlog_models::{MovieCredits, MovieMetadata};
use serde::Deserialize;

/// Movie details as returned by `GET /movie/{id}`
///
/// TMDB sends `null` for several string fields on sparse records, so those are optional
/// here and flattened to empty strings on conversion.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TmdbMovie {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    pub overview: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    pub runtime: Option<i32>,
    #[serde(default)]
    pub genres: Vec<TmdbNamed>,
    #[serde(default)]
    pub production_companies: Vec<TmdbNamed>,
    pub release_date: Option<String>,
    #[serde(default)]
    pub budget: i64,
    #[serde(default)]
    pub revenue: i64,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub homepage: Option<String>,
    pub tagline: Option<String>,
    pub status: Option<String>,
    pub original_language: Option<String>,
    #[serde(default)]
    pub spoken_languages: Vec<TmdbNamed>,
    /// Present when requested with `append_to_response=credits`
    pub credits: Option<MovieCredits>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbNamed {
    pub name: String,
}

fn join_names(items: &[TmdbNamed]) -> String {
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_release_date(value: Option<&str>) -> Option<NaiveDate> {
    value
        .filter(|v| !v.is_empty())
        .and_then(|v| NaiveDate::parse_from_str(v, "%Y-%m-%d").ok())
}

impl From<TmdbMovie> for MovieMetadata {
    fn from(movie: TmdbMovie) -> Self {
        let director = movie
            .credits
            .as_ref()
            .map(|credits| credits.crew_with_job("Director").join(", "))
            .unwrap_or_default();

        MovieMetadata {
            plot: movie.overview.unwrap_or_default(),
            genre: join_names(&movie.genres),
            director,
            rating: format!("{:.1}", movie.vote_average),
            runtime: movie.runtime.unwrap_or_default(),
            release_date: parse_release_date(movie.release_date.as_deref()),
            budget: movie.budget,
            revenue: movie.revenue,
            tagline: movie.tagline.unwrap_or_default(),
            status: movie.status.unwrap_or_default(),
            original_language: movie.original_language.unwrap_or_default(),
            production_companies: join_names(&movie.production_companies),
            spoken_languages: join_names(&movie.spoken_languages),
            poster_path: movie.poster_path.unwrap_or_default(),
            backdrop_path: movie.backdrop_path.unwrap_or_default(),
            homepage: movie.homepage.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOVIE_JSON: &str = r#"{
        "id": 965150,
        "title": "Aftersun",
        "overview": "Sophie reflects on the shared joy and private melancholy of a holiday.",
        "vote_average": 7.756,
        "runtime": 102,
        "genres": [{"id": 18, "name": "Drama"}, {"id": 35, "name": "Comedy"}],
        "production_companies": [{"id": 1, "name": "BBC Film"}, {"id": 2, "name": "A24"}],
        "release_date": "2022-10-21",
        "budget": 0,
        "revenue": 6600000,
        "poster_path": "/poster.jpg",
        "backdrop_path": null,
        "homepage": "",
        "tagline": null,
        "status": "Released",
        "original_language": "en",
        "spoken_languages": [{"english_name": "English", "iso_639_1": "en", "name": "English"}],
        "credits": {
            "id": 965150,
            "cast": [],
            "crew": [
                {"id": 1, "name": "Charlotte Wells", "job": "Director", "department": "Directing"},
                {"id": 2, "name": "Gregory Oke", "job": "Director of Photography", "department": "Camera"}
            ]
        }
    }"#;

    #[test]
    fn test_convert_movie_response() {
        let movie: TmdbMovie = serde_json::from_str(MOVIE_JSON).unwrap();
        let metadata = MovieMetadata::from(movie);

        assert_eq!(metadata.genre, "Drama, Comedy");
        assert_eq!(metadata.production_companies, "BBC Film, A24");
        assert_eq!(metadata.spoken_languages, "English");
        assert_eq!(metadata.director, "Charlotte Wells");
        assert_eq!(metadata.rating, "7.8");
        assert_eq!(metadata.runtime, 102);
        assert_eq!(metadata.release_date, NaiveDate::from_ymd_opt(2022, 10, 21));
        assert_eq!(metadata.revenue, 6_600_000);
        assert_eq!(metadata.poster_path, "/poster.jpg");
        assert_eq!(metadata.backdrop_path, "");
        assert_eq!(metadata.tagline, "");
        assert_eq!(metadata.status, "Released");
    }

    #[test]
    fn test_convert_sparse_response() {
        let movie: TmdbMovie = serde_json::from_str(r#"{"id": 1, "release_date": ""}"#).unwrap();
        let metadata = MovieMetadata::from(movie);

        assert_eq!(metadata.genre, "");
        assert_eq!(metadata.production_companies, "");
        assert_eq!(metadata.director, "");
        assert_eq!(metadata.rating, "0.0");
        assert_eq!(metadata.runtime, 0);
        assert_eq!(metadata.release_date, None);
    }
}

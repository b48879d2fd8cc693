use filmlog_models::MovieMetadata;

/// Combine the primary-locale and fallback-locale bundles for one movie.
///
/// Primary is the base. Poster and backdrop always come from the fallback, even when
/// the primary has its own. The fallback plot is used only when the primary plot is
/// empty. Every other field is the primary's.
pub fn merge_localized(primary: MovieMetadata, fallback: MovieMetadata) -> MovieMetadata {
    let mut merged = primary;

    merged.poster_path = fallback.poster_path;
    merged.backdrop_path = fallback.backdrop_path;

    if merged.plot.is_empty() {
        merged.plot = fallback.plot;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn primary() -> MovieMetadata {
        MovieMetadata {
            plot: String::new(),
            genre: "Drama, Comédia".to_string(),
            director: "Charlotte Wells".to_string(),
            rating: "7.8".to_string(),
            runtime: 102,
            tagline: "Lembranças".to_string(),
            poster_path: "/pt-poster.jpg".to_string(),
            backdrop_path: "/pt-backdrop.jpg".to_string(),
            ..MovieMetadata::default()
        }
    }

    fn fallback() -> MovieMetadata {
        MovieMetadata {
            plot: "Sophie reflects on a holiday.".to_string(),
            genre: "Drama, Comedy".to_string(),
            director: "Someone Else".to_string(),
            runtime: 99,
            tagline: "Memories".to_string(),
            poster_path: "/en-poster.jpg".to_string(),
            backdrop_path: "/en-backdrop.jpg".to_string(),
            ..MovieMetadata::default()
        }
    }

    #[test]
    fn test_empty_primary_plot_uses_fallback() {
        let merged = merge_localized(primary(), fallback());

        assert_eq!(merged.plot, "Sophie reflects on a holiday.");
        assert_eq!(merged.poster_path, "/en-poster.jpg");
        assert_eq!(merged.backdrop_path, "/en-backdrop.jpg");
        assert_eq!(merged.genre, "Drama, Comédia");
        assert_eq!(merged.director, "Charlotte Wells");
        assert_eq!(merged.runtime, 102);
        assert_eq!(merged.tagline, "Lembranças");
        assert_eq!(merged.rating, "7.8");
    }

    #[test]
    fn test_primary_plot_kept_when_present() {
        let mut base = primary();
        base.plot = "Sophie relembra as férias.".to_string();

        let merged = merge_localized(base, fallback());
        assert_eq!(merged.plot, "Sophie relembra as férias.");
    }

    #[test]
    fn test_artwork_replaced_even_when_fallback_empty() {
        let mut alt = fallback();
        alt.poster_path = String::new();
        alt.backdrop_path = String::new();

        let merged = merge_localized(primary(), alt);
        assert_eq!(merged.poster_path, "");
        assert_eq!(merged.backdrop_path, "");
    }
}

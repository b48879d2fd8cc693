use serde::{Deserialize, Serialize};

/// Cast and crew for one movie, as returned by the TMDB credits endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MovieCredits {
    pub id: i64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CastMember {
    #[serde(default)]
    pub cast_id: i64,
    #[serde(default)]
    pub character: String,
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub gender: i32,
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub order: i32,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CrewMember {
    #[serde(default)]
    pub credit_id: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub gender: i32,
    pub id: i64,
    #[serde(default)]
    pub job: String,
    pub name: String,
    pub profile_path: Option<String>,
}

impl MovieCredits {
    /// Names of crew members credited with the given job, in API order
    pub fn crew_with_job(&self, job: &str) -> Vec<&str> {
        self.crew
            .iter()
            .filter(|member| member.job == job)
            .map(|member| member.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_credits_with_missing_optional_fields() {
        let json = r#"{
            "id": 550,
            "cast": [
                {"id": 819, "name": "Edward Norton", "character": "The Narrator", "order": 0, "profile_path": null}
            ],
            "crew": [
                {"id": 7467, "name": "David Fincher", "job": "Director", "department": "Directing"},
                {"id": 7474, "name": "Ren Klyce", "job": "Sound Designer", "department": "Sound"}
            ]
        }"#;

        let credits: MovieCredits = serde_json::from_str(json).unwrap();
        assert_eq!(credits.id, 550);
        assert_eq!(credits.cast[0].character, "The Narrator");
        assert_eq!(credits.cast[0].profile_path, None);
        assert_eq!(credits.crew_with_job("Director"), vec!["David Fincher"]);
    }

    #[test]
    fn test_crew_with_job_empty() {
        let credits = MovieCredits::default();
        assert!(credits.crew_with_job("Director").is_empty());
    }
}

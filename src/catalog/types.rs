use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
}

impl Movie {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            release_date: None,
            vote_average: None,
            original_language: None,
            overview: None,
        }
    }

    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        let path = self.poster_path.as_deref().filter(|p| !p.is_empty())?;
        let base = image_base_url.trim_end_matches('/');
        if path.starts_with('/') {
            Some(format!("{}{}", base, path))
        } else {
            Some(format!("{}/{}", base, path))
        }
    }

    /// Release year, when the catalog supplied a `YYYY-MM-DD` date.
    pub fn year(&self) -> Option<&str> {
        let date = self.release_date.as_deref()?;
        let year = date.split('-').next()?;
        if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
            Some(year)
        } else {
            None
        }
    }
}

/// Body of a catalog search or discover response.
///
/// Besides the normal `results` list the catalog may answer `200 OK` with
/// `{"Response": "False", "Error": "..."}` to report a failed lookup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogPayload {
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
}

impl CatalogPayload {
    pub fn with_results(results: Vec<Movie>) -> Self {
        Self {
            response: None,
            error: None,
            results: Some(results),
        }
    }

    pub fn is_api_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

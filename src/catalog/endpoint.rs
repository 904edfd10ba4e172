/// Which catalog lookup a committed query maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /search/movie?query=...`
    Search(String),
    /// `GET /discover/movie?sort_by=popularity.desc`
    Discover,
}

impl Endpoint {
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            Endpoint::Discover
        } else {
            Endpoint::Search(query.to_string())
        }
    }

    pub fn url(&self, base_url: &str) -> String {
        let base = base_url.trim_end_matches('/');
        match self {
            Endpoint::Search(query) => {
                format!("{}/search/movie?query={}", base, urlencoding::encode(query))
            }
            Endpoint::Discover => format!("{}/discover/movie?sort_by=popularity.desc", base),
        }
    }
}

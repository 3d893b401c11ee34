//! Cover image links derived from recipe titles.
//!
//! Images are not uploaded. A recipe's cover is a search URL on an external
//! image service, built from the title at save time.

use url::{Url, form_urlencoded};

/// Default image search endpoint.
pub const DEFAULT_IMAGE_SERVICE_URL: &str = "https://source.unsplash.com/1200x900/";

/// Query used when the title is blank.
const FALLBACK_QUERY: &str = "food";

/// Builds cover image URLs against a configurable search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrlTemplate {
    base: Url,
}

impl ImageUrlTemplate {
    /// Parse the endpoint. Any existing query string is replaced per title.
    pub fn parse(base: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            base: Url::parse(base)?,
        })
    }

    /// Endpoint the template was built from.
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Cover URL for a recipe title.
    ///
    /// The query is `"<title> food"`, form-encoded.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::ImageUrlTemplate;
    ///
    /// let template = ImageUrlTemplate::default();
    /// assert_eq!(
    ///     template.for_title(" Lentil Soup "),
    ///     "https://source.unsplash.com/1200x900/?Lentil+Soup+food"
    /// );
    /// assert_eq!(
    ///     template.for_title(""),
    ///     "https://source.unsplash.com/1200x900/?food+food"
    /// );
    /// ```
    pub fn for_title(&self, title: &str) -> String {
        let trimmed = title.trim();
        let subject = if trimmed.is_empty() {
            FALLBACK_QUERY
        } else {
            trimmed
        };
        let query = format!("{subject} food");
        let encoded: String = form_urlencoded::byte_serialize(query.as_bytes()).collect();
        let mut url = self.base.clone();
        url.set_query(Some(&encoded));
        url.to_string()
    }
}

impl Default for ImageUrlTemplate {
    fn default() -> Self {
        match Self::parse(DEFAULT_IMAGE_SERVICE_URL) {
            Ok(template) => template,
            Err(error) => panic!("default image service URL must parse: {error}"),
        }
    }
}

use reqwest::{
    Method, Request, Url,
    header::{HeaderName, HeaderValue},
};

use crate::error::MetarError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Builds GET requests against the decoded-METAR endpoint.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    api_key: String,
}

impl RequestBuilder {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), api_key: api_key.into() }
    }

    /// Endpoint URL for a comma-separated station list, e.g. `KMHR,KMCC`.
    ///
    /// The list is embedded as-is and the provider validates identifiers,
    /// but characters that would leave the path segment are rejected.
    pub fn endpoint(&self, station_list: &str) -> Result<Url, MetarError> {
        if station_list.is_empty() {
            return Err(MetarError::InvalidRequest("station list is empty".to_string()));
        }
        if let Some(c) =
            station_list.chars().find(|c| matches!(c, '/' | '?' | '#') || c.is_whitespace())
        {
            return Err(MetarError::InvalidRequest(format!(
                "station list {station_list:?} contains {c:?}"
            )));
        }

        let base = self.base_url.trim_end_matches('/');
        let raw = format!("{base}/metar/{station_list}/decoded/");

        Url::parse(&raw).map_err(|e| MetarError::InvalidRequest(format!("{raw}: {e}")))
    }

    pub fn build(&self, station_list: &str) -> Result<Request, MetarError> {
        let url = self.endpoint(station_list)?;
        tracing::debug!(%url, "building METAR request");

        let key = HeaderValue::from_str(&self.api_key)
            .map_err(|e| MetarError::InvalidRequest(format!("API key is not a valid header: {e}")))?;

        let mut request = Request::new(Method::GET, url);
        request.headers_mut().insert(HeaderName::from_static(API_KEY_HEADER), key);

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn builds_decoded_endpoint_with_key_header() {
        let builder = RequestBuilder::new("https://api.checkwx.com", "KEY");
        let request = builder.build("KMHR,KMCC,KAUN,KPVF").expect("request should build");

        assert_eq!(request.method(), &Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://api.checkwx.com/metar/KMHR,KMCC,KAUN,KPVF/decoded/"
        );
        assert_eq!(request.headers().get("X-API-Key").unwrap(), "KEY");
    }

    #[test]
    fn trailing_slash_on_base_is_tolerated() {
        let builder = RequestBuilder::new("https://api.checkwx.com/", "KEY");
        let url = builder.endpoint("KLGA").unwrap();
        assert_eq!(url.as_str(), "https://api.checkwx.com/metar/KLGA/decoded/");
    }

    #[test]
    fn malformed_base_url_is_invalid_request() {
        let builder = RequestBuilder::new("not a url", "KEY");
        let err = builder.build("KLGA").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn station_list_cannot_escape_the_path_segment() {
        let builder = RequestBuilder::new("https://api.checkwx.com", "KEY");

        for list in ["KLGA?x", "KLGA/KJFK", "KLGA#frag", "KLGA KJFK", ""] {
            let err = builder.build(list).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRequest, "{list:?} should be rejected");
        }
    }

    #[test]
    fn api_key_with_newline_is_invalid_request() {
        let builder = RequestBuilder::new("https://api.checkwx.com", "bad\nkey");
        let err = builder.build("KLGA").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }
}

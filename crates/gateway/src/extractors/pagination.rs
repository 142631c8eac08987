//! Page-number pagination extractor.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, OriginalUri},
    http::{header, request::Parts, HeaderMap, Uri},
};

use common::{AppError, AppResult, Page, PageNumber, PageRequest, PageWindow};

use crate::response::Paginated;

const PAGE_PARAM: &str = "page";
const PAGE_SIZE_PARAM: &str = "page_size";

/// Page size policy taken from application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSettings {
    pub default_size: u64,
    /// Cap for `page_size`, none by default
    pub max_size: Option<u64>,
}

/// `page` / `page_size` query parameters plus what is needed to build links.
///
/// The page number is parsed lazily so handlers that do not paginate ignore it.
#[derive(Debug, Clone)]
pub struct Pagination {
    page: Option<String>,
    size: u64,
    links: PageLinks,
}

impl Pagination {
    /// The requested page; an unparseable `page` is an invalid page.
    pub fn request(&self) -> AppResult<PageRequest> {
        let number = match self.page.as_deref() {
            None => PageNumber::Number(1),
            Some(raw) => PageNumber::parse(raw)?,
        };
        Ok(PageRequest {
            number,
            size: self.size,
        })
    }

    /// Wrap a page into the `{count, next, previous, results}` envelope.
    pub fn envelope<T, U>(&self, page: Page<T>) -> Paginated<U>
    where
        U: From<T>,
    {
        let window = page.window;
        Paginated {
            count: window.total,
            next: self.links.next(&window),
            previous: self.links.previous(&window),
            results: page.items.into_iter().map(U::from).collect(),
        }
    }

    pub fn links(&self) -> &PageLinks {
        &self.links
    }
}

/// Absolute links to neighbouring pages of the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLinks {
    base: String,
    query: Vec<(String, String)>,
}

impl PageLinks {
    /// Links for `url` (scheme, host and path), keeping `query` minus `page`.
    pub fn new(url: impl Into<String>, query: Vec<(String, String)>) -> Self {
        Self {
            base: url.into(),
            query: query.into_iter().filter(|(key, _)| key != PAGE_PARAM).collect(),
        }
    }

    /// URL of page `number`. Page 1 carries no `page` parameter.
    pub fn link(&self, number: u64) -> String {
        let mut pairs: Vec<(&str, String)> = self
            .query
            .iter()
            .map(|(key, value)| (key.as_str(), value.clone()))
            .collect();
        if number > 1 {
            pairs.push((PAGE_PARAM, number.to_string()));
        }
        pairs.sort_by(|a, b| a.0.cmp(b.0));

        match serde_urlencoded::to_string(&pairs) {
            Ok(query) if !query.is_empty() => format!("{}?{}", self.base, query),
            _ => self.base.clone(),
        }
    }

    pub fn next(&self, window: &PageWindow) -> Option<String> {
        window.has_next().then(|| self.link(window.number + 1))
    }

    pub fn previous(&self, window: &PageWindow) -> Option<String> {
        window.has_previous().then(|| self.link(window.number - 1))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
    PageSettings: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let settings = PageSettings::from_ref(state);

        // Nested routers see a stripped path; links need the full one
        let uri = parts
            .extensions
            .get::<OriginalUri>()
            .map(|original| original.0.clone())
            .unwrap_or_else(|| parts.uri.clone());

        let query: Vec<(String, String)> =
            serde_urlencoded::from_str(uri.query().unwrap_or_default())
                .map_err(|e| AppError::validation(format!("Malformed query string: {}", e)))?;

        let page = query
            .iter()
            .find(|(key, _)| key == PAGE_PARAM)
            .map(|(_, value)| value.clone())
            .filter(|value| !value.is_empty());
        let size = PageRequest::size_from_query(
            query
                .iter()
                .find(|(key, _)| key == PAGE_SIZE_PARAM)
                .map(|(_, value)| value.as_str()),
            settings.default_size,
            settings.max_size,
        );

        Ok(Pagination {
            page,
            size,
            links: PageLinks::new(request_url(&parts.headers, &uri), query),
        })
    }
}

/// `scheme://host/path` of the request as the client addressed it
fn request_url(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.scheme_str())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|authority| authority.as_str()))
        .unwrap_or("localhost");

    format!("{}://{}{}", scheme, host, uri.path())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn settings() -> PageSettings {
        PageSettings {
            default_size: 10,
            max_size: None,
        }
    }

    async fn extract(uri: &str) -> Pagination {
        extract_with(uri, settings()).await
    }

    async fn extract_with(uri: &str, settings: PageSettings) -> Pagination {
        let request = Request::builder()
            .uri(uri)
            .header(header::HOST, "api.test")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();
        Pagination::from_request_parts(&mut parts, &settings)
            .await
            .unwrap()
    }

    fn window(number: u64, num_pages: u64) -> PageWindow {
        PageWindow {
            number,
            size: 10,
            num_pages,
            total: num_pages * 10,
        }
    }

    #[tokio::test]
    async fn test_defaults_without_query() {
        let pagination = extract("/items/").await;
        let request = pagination.request().unwrap();

        assert_eq!(request.number, PageNumber::Number(1));
        assert_eq!(request.size, 10);
    }

    #[tokio::test]
    async fn test_page_size_and_last() {
        let pagination = extract("/items/?page=last&page_size=500").await;
        let request = pagination.request().unwrap();

        assert_eq!(request.number, PageNumber::Last);
        assert_eq!(request.size, 500);
    }

    #[tokio::test]
    async fn test_configured_cap_limits_page_size() {
        let capped = PageSettings {
            default_size: 10,
            max_size: Some(100),
        };
        let pagination = extract_with("/items/?page_size=500", capped).await;

        assert_eq!(pagination.request().unwrap().size, 100);
    }

    #[tokio::test]
    async fn test_invalid_page_is_rejected_lazily() {
        let pagination = extract("/items/?page=abc").await;

        assert!(matches!(
            pagination.request(),
            Err(AppError::InvalidPage(_))
        ));
    }

    #[tokio::test]
    async fn test_links_keep_other_params() {
        let pagination = extract("/items/?page=2&page_size=5&q=a%20b").await;
        let links = pagination.links();

        assert_eq!(
            links.next(&window(2, 3)).as_deref(),
            Some("http://api.test/items/?page=3&page_size=5&q=a+b")
        );
        assert_eq!(
            links.previous(&window(2, 3)).as_deref(),
            Some("http://api.test/items/?page_size=5&q=a+b")
        );
        assert_eq!(links.next(&window(3, 3)), None);
        assert_eq!(links.previous(&window(1, 3)), None);
    }

    #[test]
    fn test_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-proto", "https".parse().unwrap());
        headers.insert(header::HOST, "shop.example".parse().unwrap());
        let uri: Uri = "/api/v1/task1/products/?page=2".parse().unwrap();

        assert_eq!(
            request_url(&headers, &uri),
            "https://shop.example/api/v1/task1/products/"
        );
    }

    #[test]
    fn test_first_page_link_drops_page() {
        let links = PageLinks::new("http://h/p/", vec![("page".into(), "3".into())]);

        assert_eq!(links.link(1), "http://h/p/");
        assert_eq!(links.link(2), "http://h/p/?page=2");
    }
}

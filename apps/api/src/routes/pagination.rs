//! Pagination response headers shared by list endpoints.

use axum::http::{header::HOST, HeaderMap, HeaderValue, Uri};
use reqwest::Url;
use tracing::debug;

use crate::models::paging::total_pages;

/// Absolute URL of the inbound request, as the client addressed it.
pub fn request_url(headers: &HeaderMap, uri: &Uri) -> String {
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
    format!("{scheme}://{host}{path_and_query}")
}

/// `X-Page`, `X-Per-Page`, `X-Total`, `X-Total-Pages`, the optional
/// `X-Prev-Page` / `X-Next-Page`, and an RFC 5988 `Link` header.
pub fn pagination_headers(request_url: &str, page: u64, per_page: u64, total: u64) -> HeaderMap {
    let total_pages = total_pages(total, per_page);
    let mut headers = HeaderMap::new();

    if page > 1 {
        headers.insert("x-prev-page", HeaderValue::from(page - 1));
    }
    if page < total_pages {
        headers.insert("x-next-page", HeaderValue::from(page + 1));
    }
    headers.insert("x-page", HeaderValue::from(page));
    headers.insert("x-per-page", HeaderValue::from(per_page));
    headers.insert("x-total", HeaderValue::from(total));
    headers.insert("x-total-pages", HeaderValue::from(total_pages));

    if total_pages == 0 {
        return headers;
    }
    let url = match Url::parse(request_url) {
        Ok(url) => url,
        Err(e) => {
            debug!("Skipping Link header for {request_url:?}: {e}");
            return headers;
        }
    };

    let mut links = vec![
        format!("<{}>; rel=\"first\"", page_link(&url, 1)),
        format!("<{}>; rel=\"last\"", page_link(&url, total_pages)),
    ];
    if page > 1 {
        links.push(format!("<{}>; rel=\"prev\"", page_link(&url, page - 1)));
    }
    if page < total_pages {
        links.push(format!("<{}>; rel=\"next\"", page_link(&url, page + 1)));
    }
    if let Ok(value) = HeaderValue::from_str(&links.join(", ")) {
        headers.insert("link", value);
    }
    headers
}

/// The request URL with `page` set, other query parameters kept in order.
fn page_link(url: &Url, page: u64) -> String {
    let page = page.to_string();
    let mut replaced = false;
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            if k == "page" {
                replaced = true;
                (k.into_owned(), page.clone())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    let mut link = url.clone();
    {
        let mut query = link.query_pairs_mut();
        query.clear();
        query.extend_pairs(pairs);
        if !replaced {
            query.append_pair("page", &page);
        }
    }
    link.to_string()
}

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use ifra_core::ColumnMap;
use ifra_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, Locator, ResponseShape,
    Strategy,
};

pub const BASE: &str = "http://fake.test/transparency-list";

/// In-memory transport. Unknown URLs answer the fallback, or 404 without one.
/// Every call is recorded.
#[derive(Default)]
pub struct FakeFetcher {
    routes: HashMap<String, Result<FetchOutput, FetchError>>,
    fallback: Option<FetchOutput>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(self, url: &str, body: impl Into<String>) -> Self {
        self.body(url, body.into(), "text/html; charset=utf-8")
    }

    pub fn json(self, url: &str, body: impl Into<String>) -> Self {
        self.body(url, body.into(), "application/json")
    }

    pub fn fail(mut self, url: &str, kind: FailureKind) -> Self {
        self.routes
            .insert(url.to_string(), Err(FetchError::new(kind, "fake failure")));
        self
    }

    /// Serve `body` for every URL without its own route.
    pub fn fallback_html(mut self, body: impl Into<String>) -> Self {
        self.fallback = Some(output("*", body.into(), "text/html; charset=utf-8"));
        self
    }

    fn body(mut self, url: &str, body: String, content_type: &str) -> Self {
        self.routes
            .insert(url.to_string(), Ok(output(url, body, content_type)));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(route) = self.routes.get(url) {
            return route.clone();
        }
        self.fallback
            .clone()
            .ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "not found"))
    }
}

fn output(url: &str, body: String, content_type: &str) -> FetchOutput {
    let bytes = body.into_bytes();
    let metadata = FetchMetadata {
        original_url: url.to_string(),
        final_url: url.to_string(),
        redirect_count: 0,
        content_type: Some(content_type.to_string()),
        byte_len: bytes.len() as u64,
    };
    FetchOutput { bytes, metadata }
}

pub fn page_url(page: u32) -> String {
    if page == 1 {
        BASE.to_string()
    } else {
        format!("{BASE}?page={page}")
    }
}

/// Listing page in the name-first layout. Includes a header row inside the body.
pub fn listing_page(rows: &[(&str, &str, &str)], next: bool) -> String {
    let mut html = String::from(
        "<html><body><table class=\"views-table\"><tbody>\
         <tr><td>Ingredient</td><td>CAS Number</td><td>NCS</td></tr>",
    );
    for (name, cas, ncs) in rows {
        html.push_str(&format!(
            "<tr class=\"odd\"><td> {name} </td><td>{cas}</td><td>{ncs}</td></tr>"
        ));
    }
    html.push_str("</tbody></table>");
    if next {
        html.push_str(
            "<ul class=\"pager\"><li class=\"next\">\
             <a rel=\"next\" href=\"?page=x\">next</a></li></ul>",
        );
    }
    html.push_str("</body></html>");
    html
}

pub fn empty_page() -> String {
    "<html><body><p>No results.</p></body></html>".to_string()
}

pub fn listing_strategy(name: &str, with_next_links: bool) -> Strategy {
    Strategy {
        name: name.to_string(),
        locator: Locator::Query {
            param: "page".to_string(),
            start: 1,
            bare_first: true,
        },
        shape: ResponseShape::Markup {
            row_selectors: vec!["table.views-table tbody tr".to_string(), "tr.odd".to_string()],
            next_page_selectors: if with_next_links {
                vec!["a[rel=\"next\"]".to_string()]
            } else {
                Vec::new()
            },
        },
        columns: ColumnMap::name_first(),
    }
}

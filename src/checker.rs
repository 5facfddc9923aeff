//! Page checker
//!
//! Fetches a registered url once, extracts title / h1 / meta description and
//! records the result as a new check. A failed fetch records nothing.

use std::sync::{Arc, LazyLock};

use chrono::Utc;
use scraper::{Html, Selector};

use crate::error::CheckError;
use crate::logger;
use crate::model::{PageMetadata, UrlCheck};
use crate::store::{self, UrlRepository};

static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));
static H1: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").expect("valid h1 selector"));
static DESCRIPTION: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"meta[name="description"]"#).expect("valid description selector")
});

/// Runs checks against stored urls
#[derive(Clone)]
pub struct PageChecker {
    store: Arc<dyn UrlRepository>,
    http: reqwest::Client,
}

impl PageChecker {
    pub fn new(store: Arc<dyn UrlRepository>, user_agent: &str) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().user_agent(user_agent).build()?;
        Ok(Self { store, http })
    }

    /// Fetch the url with id `url_id` and store what was found
    pub async fn check(&self, url_id: i64) -> Result<UrlCheck, CheckError> {
        let repo = Arc::clone(&self.store);
        let url = store::run_blocking(move || repo.find_url(url_id))
            .await?
            .ok_or(CheckError::NotFound(url_id))?;

        let (status_code, body) = match self.fetch(&url.name).await {
            Ok(page) => page,
            Err(source) => {
                logger::log_warning(&format!("[Checker] {} unreachable: {source}", url.name));
                return Err(CheckError::Fetch {
                    url: url.name,
                    source,
                });
            }
        };

        let metadata = extract_metadata(status_code, &body);
        let repo = Arc::clone(&self.store);
        let url_id = url.id;
        let check =
            store::run_blocking(move || repo.create_check(url_id, &metadata, Utc::now())).await?;
        logger::log_info(&format!(
            "[Checker] #{} {} -> {}",
            url.id, url.name, check.status_code
        ));
        Ok(check)
    }

    async fn fetch(&self, target: &str) -> Result<(u16, String), reqwest::Error> {
        let response = self.http.get(target).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok((status, body))
    }
}

/// Pull the check fields out of an HTML document. Missing elements yield empty strings.
pub fn extract_metadata(status_code: u16, html: &str) -> PageMetadata {
    let document = Html::parse_document(html);

    let first_text = |selector: &Selector| {
        document
            .select(selector)
            .next()
            .map(|el| normalize_whitespace(&el.text().collect::<String>()))
            .unwrap_or_default()
    };

    let description = document
        .select(&DESCRIPTION)
        .next()
        .and_then(|el| el.value().attr("content"))
        .unwrap_or_default()
        .to_string();

    PageMetadata {
        status_code,
        title: first_text(&TITLE),
        h1: first_text(&H1),
        description,
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

// Page templates

use std::fmt::Write as _;

use super::{escape, format_date, layout, APP_NAME};
use crate::http::Flash;
use crate::model::{Page, UrlDetails, UrlSummary};

/// Landing page with the submission form
pub fn index_page(flash: Option<&Flash>) -> String {
    let content = format!(
        r#"<h1>{APP_NAME}</h1>
<p>Check websites for SEO suitability for free</p>
<form action="/urls" method="post">
    <input type="text" name="url" placeholder="https://www.example.com" aria-label="url" required>
    <input type="submit" value="Check">
</form>"#
    );
    layout(APP_NAME, flash, &content)
}

/// Paginated list of registered sites
pub fn urls_page(page: &Page<UrlSummary>, flash: Option<&Flash>) -> String {
    let mut rows = String::new();
    for entry in &page.entries {
        let (checked_at, status) = entry.last_check.as_ref().map_or_else(
            || (String::new(), String::new()),
            |c| (format_date(&c.created_at), c.status_code.to_string()),
        );
        let _ = write!(
            rows,
            r#"
        <tr>
            <td>{id}</td>
            <td><a href="/urls/{id}">{name}</a></td>
            <td>{checked_at}</td>
            <td>{status}</td>
        </tr>"#,
            id = entry.url.id,
            name = escape(&entry.url.name),
        );
    }

    let content = format!(
        r#"<h1>Sites</h1>
<table data-test="urls">
    <thead>
        <tr><th>ID</th><th>Name</th><th>Last check</th><th>Response code</th></tr>
    </thead>
    <tbody>{rows}
    </tbody>
</table>
{pagination}"#,
        pagination = render_pagination(page.current_page, page.total_pages),
    );
    layout(&format!("Sites - {APP_NAME}"), flash, &content)
}

fn render_pagination(current: u64, total: u64) -> String {
    if total <= 1 {
        return String::new();
    }

    let mut links = String::from(r#"<nav class="pagination">"#);
    if current > 1 {
        let _ = write!(links, r#"<a href="/urls?page={}">&laquo;</a>"#, current - 1);
    }
    for n in 1..=total {
        if n == current {
            let _ = write!(links, r#"<span class="active">{n}</span>"#);
        } else {
            let _ = write!(links, r#"<a href="/urls?page={n}">{n}</a>"#);
        }
    }
    if current < total {
        let _ = write!(links, r#"<a href="/urls?page={}">&raquo;</a>"#, current + 1);
    }
    links.push_str("</nav>");
    links
}

/// One site with its check history
pub fn url_page(details: &UrlDetails, flash: Option<&Flash>) -> String {
    let url = &details.url;

    let mut rows = String::new();
    for check in &details.checks {
        let _ = write!(
            rows,
            r#"
        <tr>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
            <td>{}</td>
        </tr>"#,
            check.id,
            check.status_code,
            escape(&check.h1),
            escape(&check.title),
            escape(&check.description),
            format_date(&check.created_at),
        );
    }

    let content = format!(
        r#"<h1>Site: {name}</h1>
<table data-test="url">
    <tr><th>ID</th><td>{id}</td></tr>
    <tr><th>Name</th><td>{name}</td></tr>
    <tr><th>Created at</th><td>{created_at}</td></tr>
</table>
<h2>Checks</h2>
<form action="/urls/{id}/checks" method="post">
    <input type="submit" value="Run check">
</form>
<table data-test="checks">
    <thead>
        <tr><th>ID</th><th>Response code</th><th>h1</th><th>title</th><th>description</th><th>Checked at</th></tr>
    </thead>
    <tbody>{rows}
    </tbody>
</table>"#,
        id = url.id,
        name = escape(&url.name),
        created_at = format_date(&url.created_at),
    );
    layout(&format!("{} - {APP_NAME}", url.name), flash, &content)
}

pub fn not_found_page() -> String {
    layout(
        &format!("Not found - {APP_NAME}"),
        None,
        r#"<h1>404</h1><p>The page you are looking for does not exist.</p><p><a href="/">Back to the start page</a></p>"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Url, UrlCheck};
    use chrono::Utc;

    fn url(id: i64, name: &str) -> Url {
        Url {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_index_has_form() {
        let html = index_page(None);
        assert!(html.contains(r#"action="/urls" method="post""#));
        assert!(html.contains(r#"name="url""#));
    }

    #[test]
    fn test_urls_page_lists_entries_and_last_check() {
        let page = Page {
            entries: vec![
                UrlSummary {
                    url: url(1, "https://hexlet.io"),
                    last_check: Some(UrlCheck {
                        id: 9,
                        url_id: 1,
                        status_code: 301,
                        title: String::new(),
                        h1: String::new(),
                        description: String::new(),
                        created_at: Utc::now(),
                    }),
                },
                UrlSummary {
                    url: url(2, "https://github.com:8081"),
                    last_check: None,
                },
            ],
            total_pages: 1,
            current_page: 1,
        };

        let html = urls_page(&page, None);
        assert!(html.contains(r#"<a href="/urls/1">https://hexlet.io</a>"#));
        assert!(html.contains("https://github.com:8081"));
        assert!(html.contains("<td>301</td>"));
        assert!(!html.contains(r#"class="pagination""#));
    }

    #[test]
    fn test_pagination_links() {
        let html = render_pagination(2, 3);
        assert!(html.contains(r#"<a href="/urls?page=1">&laquo;</a>"#));
        assert!(html.contains(r#"<span class="active">2</span>"#));
        assert!(html.contains(r#"<a href="/urls?page=3">3</a>"#));
        assert!(html.contains(r#"<a href="/urls?page=3">&raquo;</a>"#));
        assert!(render_pagination(1, 1).is_empty());
    }

    #[test]
    fn test_url_page_escapes_check_fields() {
        let details = UrlDetails {
            url: url(4, "https://example.com"),
            checks: vec![UrlCheck {
                id: 1,
                url_id: 4,
                status_code: 200,
                title: "<b>T</b>".to_string(),
                h1: "H".to_string(),
                description: "D & more".to_string(),
                created_at: Utc::now(),
            }],
        };

        let html = url_page(&details, None);
        assert!(html.contains(r#"action="/urls/4/checks""#));
        assert!(html.contains("&lt;b&gt;T&lt;/b&gt;"));
        assert!(html.contains("D &amp; more"));
        assert!(html.contains("<td>200</td>"));
    }
}

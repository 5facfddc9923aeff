//! Server-side HTML rendering
//!
//! Pages are plain `format!` templates sharing one layout. Every value that
//! came from a user or a fetched page goes through `escape`.

mod pages;

use chrono::{DateTime, Utc};

use crate::http::Flash;

pub use pages::{index_page, not_found_page, url_page, urls_page};

pub const APP_NAME: &str = "Page Analyzer";

/// Escape text for use in HTML content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Timestamp as shown in tables: `dd/mm/yyyy HH:MM` (UTC)
pub fn format_date(time: &DateTime<Utc>) -> String {
    time.format("%d/%m/%Y %H:%M").to_string()
}

fn render_flash(flash: Option<&Flash>) -> String {
    flash.map_or_else(String::new, |f| {
        format!(
            r#"<div class="alert alert-{}" role="alert">{}</div>"#,
            f.severity.as_str(),
            escape(&f.message)
        )
    })
}

/// Wrap page content in the shared layout
fn layout(title: &str, flash: Option<&Flash>, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, "Helvetica Neue", Arial, sans-serif;
            line-height: 1.6;
            margin: 0;
            background: #f5f5f5;
            color: #333;
        }}
        nav {{
            background: #343a40;
            padding: 12px 24px;
        }}
        nav a {{
            color: #fff;
            margin-right: 20px;
            text-decoration: none;
        }}
        main {{
            max-width: 960px;
            margin: 0 auto;
            padding: 24px;
        }}
        .alert {{ padding: 12px 16px; border-radius: 4px; margin-bottom: 20px; }}
        .alert-success {{ background: #d1e7dd; color: #0f5132; }}
        .alert-info {{ background: #cff4fc; color: #055160; }}
        .alert-danger {{ background: #f8d7da; color: #842029; }}
        table {{ width: 100%; border-collapse: collapse; background: #fff; margin: 20px 0; }}
        th, td {{ border: 1px solid #ddd; padding: 8px 12px; text-align: left; }}
        th {{ background: #e9ecef; }}
        .pagination a, .pagination span {{ margin-right: 8px; }}
        .pagination .active {{ font-weight: bold; }}
        input[type=text] {{ width: 60%; padding: 8px; }}
        button, input[type=submit] {{ padding: 8px 16px; }}
    </style>
</head>
<body>
<nav>
    <a href="/">{APP_NAME}</a>
    <a href="/">Home</a>
    <a href="/urls">Sites</a>
</nav>
<main>
{flash}
{content}
</main>
</body>
</html>"#,
        title = escape(title),
        flash = render_flash(flash),
    )
}

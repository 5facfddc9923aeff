//! Request data parsing: urlencoded forms, query strings and cookies

use hyper::header::COOKIE;
use hyper::HeaderMap;
use url::form_urlencoded;

/// First value of `name` in an `application/x-www-form-urlencoded` payload
pub fn form_value(body: &[u8], name: &str) -> Option<String> {
    form_urlencoded::parse(body)
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// First value of `name` in a query string (without the leading `?`)
pub fn query_value(query: Option<&str>, name: &str) -> Option<String> {
    form_value(query?.as_bytes(), name)
}

/// Value of the cookie `name` from the request's `Cookie` headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

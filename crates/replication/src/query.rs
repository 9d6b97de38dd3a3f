//! List-URL construction shared by every base client.
//!
//! Produces `/<resource>[/detail][?<query>]` where the query parameters are
//! sorted by name and form-urlencoded so that identical options always yield
//! an identical URL.

use std::collections::BTreeMap;

use crate::{ClientError, ListOptions};

/// Accepted sort directions.
pub const SORT_DIR_VALUES: [&str; 2] = ["asc", "desc"];

/// Builds the list URL for `resource_type` from `options`.
///
/// # Errors
///
/// Returns [`ClientError::InvalidSort`] if a sort key is empty or a sort
/// direction is not one of [`SORT_DIR_VALUES`].
pub fn build_list_url(resource_type: &str, options: &ListOptions) -> Result<String, ClientError> {
    let mut params: BTreeMap<String, String> = options
        .search_opts
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if let Some(marker) = options.marker.as_deref().filter(|m| !m.is_empty()) {
        params.insert("marker".into(), marker.to_string());
    }
    if let Some(limit) = options.limit.filter(|l| *l > 0) {
        params.insert("limit".into(), limit.to_string());
    }

    match options.sort.as_deref().filter(|s| !s.is_empty()) {
        Some(sort) => {
            params.insert("sort".into(), format_sort(sort)?);
        }
        None => {
            if let Some(key) = options.sort_key.as_deref().filter(|k| !k.is_empty()) {
                params.insert("sort_key".into(), format_sort_key(key)?);
            }
            if let Some(dir) = options.sort_dir.as_deref().filter(|d| !d.is_empty()) {
                params.insert("sort_dir".into(), format_sort_dir(dir)?);
            }
        }
    }

    let detail = if options.detailed { "/detail" } else { "" };
    let query = if params.is_empty() {
        String::new()
    } else {
        let encoded: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect();
        format!("?{}", encoded.join("&"))
    };

    Ok(format!("/{resource_type}{detail}{query}"))
}

/// Normalises a comma-separated `key[:dir]` sort specification.
///
/// Empty items are skipped; keys and directions are trimmed.
pub fn format_sort(sort: &str) -> Result<String, ClientError> {
    let mut items = Vec::new();
    for item in sort.split(',').filter(|s| !s.is_empty()) {
        let (key, dir) = match item.split_once(':') {
            Some((key, dir)) => (key, Some(dir)),
            None => (item, None),
        };
        let key = format_sort_key(key)?;
        match dir.map(str::trim).filter(|d| !d.is_empty()) {
            Some(dir) => items.push(format!("{key}:{}", format_sort_dir(dir)?)),
            None => items.push(key),
        }
    }
    Ok(items.join(","))
}

fn format_sort_key(key: &str) -> Result<String, ClientError> {
    let key = key.trim();
    if key.is_empty() {
        return Err(ClientError::InvalidSort("sort key must not be empty".into()));
    }
    Ok(key.to_string())
}

fn format_sort_dir(dir: &str) -> Result<String, ClientError> {
    let dir = dir.trim();
    if SORT_DIR_VALUES.contains(&dir) {
        Ok(dir.to_string())
    } else {
        Err(ClientError::InvalidSort(format!(
            "sort_dir must be one of the following: {}",
            SORT_DIR_VALUES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_list_has_no_query() {
        let url = build_list_url("replications", &ListOptions::new()).unwrap();
        assert_eq!(url, "/replications");
    }

    #[test]
    fn detailed_selects_detail_path() {
        let url = build_list_url("replications", &ListOptions::new().detailed(true)).unwrap();
        assert_eq!(url, "/replications/detail");
    }

    #[test]
    fn parameters_are_sorted_and_encoded() {
        let options = ListOptions::new()
            .with_search_opt("status", "enabled")
            .with_search_opt("name", "my rep")
            .with_marker("r-9")
            .with_limit(20);
        let url = build_list_url("replications", &options).unwrap();
        assert_eq!(
            url,
            "/replications?limit=20&marker=r-9&name=my%20rep&status=enabled"
        );
    }

    #[test]
    fn empty_search_values_and_zero_limit_are_dropped() {
        let options = ListOptions::new()
            .with_search_opt("status", "")
            .with_marker("")
            .with_limit(0);
        let url = build_list_url("replications", &options).unwrap();
        assert_eq!(url, "/replications");
    }

    #[test]
    fn sort_takes_precedence_over_key_and_dir() {
        let options = ListOptions::new()
            .with_sort(" status:desc , name ")
            .with_sort_key("id")
            .with_sort_dir("asc");
        let url = build_list_url("replications", &options).unwrap();
        assert_eq!(url, "/replications?sort=status%3Adesc%2Cname");
    }

    #[test]
    fn legacy_sort_pair_is_sent_when_sort_absent() {
        let options = ListOptions::new().with_sort_key("name").with_sort_dir("desc");
        let url = build_list_url("replications", &options).unwrap();
        assert_eq!(url, "/replications?sort_dir=desc&sort_key=name");
    }

    #[test]
    fn invalid_sort_direction_is_rejected() {
        let err = build_list_url("replications", &ListOptions::new().with_sort("name:up"))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSort(_)));

        let err = build_list_url("replications", &ListOptions::new().with_sort_dir("sideways"))
            .unwrap_err();
        assert!(matches!(err, ClientError::InvalidSort(_)));
    }

    #[test]
    fn empty_sort_key_is_rejected() {
        let err = format_sort(":asc").unwrap_err();
        assert!(matches!(err, ClientError::InvalidSort(_)));
    }

    #[test]
    fn format_sort_skips_empty_items() {
        assert_eq!(format_sort("name,,status:asc,").unwrap(), "name,status:asc");
    }
}

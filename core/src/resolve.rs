//! Request URL resolution.
//!
//! Paths resolve against the base URL with standard RFC 3986 rules, so a
//! base that should act as a directory needs its trailing slash:
//! `https://h/api/` + `./tags` is `https://h/api/tags`, while
//! `https://h/api` + `./tags` is `https://h/tags`. An absolute path replaces
//! the base entirely.

use url::Url;

use crate::error::RequestError;

/// Resolve `path` against `base` and append `params` as a query string.
///
/// An empty `base` means `path` must already be absolute. Params are
/// form-urlencoded in the order given and follow any query `path` carries.
pub fn resolve_url(
    base: &str,
    path: &str,
    params: Option<&[(&str, &str)]>,
) -> Result<Url, RequestError> {
    let mut url = if base.is_empty() {
        Url::parse(path).map_err(|e| RequestError::InvalidUrl(format!("{path}: {e}")))?
    } else {
        let base_url =
            Url::parse(base).map_err(|e| RequestError::InvalidUrl(format!("{base}: {e}")))?;
        base_url
            .join(path)
            .map_err(|e| RequestError::InvalidUrl(format!("{path} against {base}: {e}")))?
    };

    if let Some(params) = params.filter(|p| !p.is_empty()) {
        url.query_pairs_mut().extend_pairs(params.iter());
    }
    Ok(url)
}

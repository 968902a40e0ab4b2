use crate::Error;
use percent_encoding::percent_decode_str;
use url::Url;

fn config_error(message: &str, source: Option<url::ParseError>) -> Error {
    Error::InvalidConfig {
        message: message.into(),
        source: source.map(|err| Box::new(err) as _),
    }
}

/// Parse the server URL and make sure its path ends in `/`, so that
/// `https://host/jenkins` keeps its `/jenkins` prefix when paths are added.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut base = Url::parse(raw).map_err(|err| config_error("invalid base URL", Some(err)))?;
    if base.cannot_be_a_base() {
        return Err(config_error("base URL cannot carry a path", None));
    }
    if base.query().is_some() || base.fragment().is_some() {
        return Err(config_error("base URL must not have a query or fragment", None));
    }
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    Ok(base)
}

/// `base` + encoded `segments` + `query`.
pub(crate) fn resolve<'a>(
    base: &Url,
    segments: impl IntoIterator<Item = &'a str>,
    query: &[(String, String)],
) -> Result<Url, Error> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| config_error("base URL cannot carry a path", None))?
        .pop_if_empty()
        .extend(segments);
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Split a caller-written path into decoded segments. [`resolve`] encodes
/// them again, so `j%20doe` goes out as `j%20doe` and not `j%2520doe`.
pub(crate) fn path_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned())
        .collect()
}

/// The URL without query, fragment or credentials, for error reports.
pub(crate) fn sanitize_url_for_error(url: &Url) -> Url {
    let mut safe = url.clone();
    safe.set_query(None);
    safe.set_fragment(None);
    // Both only fail for URLs that cannot carry credentials in the first place.
    let _ = safe.set_username("");
    let _ = safe.set_password(None);
    safe
}

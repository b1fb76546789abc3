//! Upstream URL composition.

use crate::discovery::ServiceInstance;

/// `http://{authority}/{path}[?{query}]`.
///
/// Leading slashes of `path` collapse into the single joining slash. The
/// query is appended verbatim.
pub fn target_url(instance: &ServiceInstance, path: &str, query: Option<&str>) -> String {
    let mut url = format!("http://{}/{}", instance.authority(), path.trim_start_matches('/'));
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}

//! Shareable URL state.
//!
//! The active topic is mirrored into the `topic` query parameter so a page
//! state can be bookmarked or shared, and read back to reconstruct the
//! initial topic.

use url::Url;

use crate::models::Topic;

/// Query parameter holding the topic.
pub const TOPIC_PARAM: &str = "topic";

/// Returns `base` with the `topic` parameter set to `topic`.
///
/// Any previous `topic` parameter is replaced; other parameters are kept in
/// order.
pub fn share_url(base: &Url, topic: &Topic) -> Url {
    let mut url = base.clone();
    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| *key != TOPIC_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(retained.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .append_pair(TOPIC_PARAM, topic.as_str());
    url
}

/// Reads the topic from a URL's query string.
pub fn topic_from_url(url: &Url) -> Option<Topic> {
    url.query_pairs()
        .find(|(key, _)| *key == TOPIC_PARAM)
        .and_then(|(_, value)| Topic::parse(value.as_ref()))
}

/// Parses `raw` as a URL and reads the topic from it.
///
/// Unparseable input yields `None` rather than an error.
pub fn topic_from_str(raw: &str) -> Option<Topic> {
    Url::parse(raw.trim()).ok().as_ref().and_then(topic_from_url)
}

//! HTML listing renderer
//!
//! Turns an ordered sequence of entry names into the browsable index
//! page: one link per line at a fixed large font size. Entry names come
//! from the backend listing and are rendered without escaping. Ordering
//! is the caller's responsibility and is preserved exactly.

use std::fmt::Write;

/// Render an index page linking each entry as `{base_url}/{entry}`.
pub fn listing_page<'a, I>(entries: I, base_url: &str) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut page = String::from("<body>\n");
    for entry in entries {
        let _ = write!(
            page,
            "<br><tr>&emsp;&emsp;<a href=\"{base_url}/{entry}\"> <font size=\"18\"> {entry}</font></a></tr>"
        );
    }
    page.push_str("</body>\n");
    page
}

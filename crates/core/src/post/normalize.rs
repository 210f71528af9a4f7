use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{Html, Node};

use crate::error::{Error, Result};
use crate::microformats::{Jf2, Value};

/// A plain decimal number: optional sign, digits, optional fraction.
const DECIMAL: &str = r"[-+]?\d+(?:\.\d+)?";

static DECIMAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("^{DECIMAL}$")).unwrap());

/// Geo URI (RFC 5870): `geo:<lat>,<lon>[,<alt>]`, optionally followed by
/// `;`-separated parameters.
static GEO_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r"^geo:(?P<lat>{DECIMAL}),(?P<lon>{DECIMAL})(?:,(?P<alt>{DECIMAL}))?(?:;.*)?$"
    ))
    .unwrap()
});

static SCRIPT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());

static STYLE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());

const BLOCK_ELEMENTS: [&str; 16] = [
    "address", "article", "blockquote", "br", "div", "footer", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "li", "p", "pre",
];

/// Rewrites raw properties into the shapes the binder expects.
///
/// - `content`: a string becomes `{html, text}`; a missing half is derived
///   from the other.
/// - `location`: a Geo URI becomes `{latitude, longitude, altitude?}`.
/// - `photo`: strings become `{value, alt: ""}` entries in a list.
/// - `slug` moves to `mp-slug`.
/// - `published` defaults to `now`.
///
/// Other properties pass through unchanged.
pub fn normalize(mut jf2: Jf2, now: DateTime<Utc>) -> Result<Jf2> {
    if let Some(content) = jf2.remove("content") {
        jf2.insert("content", normalize_content(content)?);
    }
    if let Some(location) = jf2.remove("location") {
        jf2.insert("location", normalize_location(location)?);
    }
    if let Some(photo) = jf2.remove("photo") {
        jf2.insert("photo", normalize_photo(photo)?);
    }
    // slug is deprecated, move it to mp-slug
    if let Some(slug) = jf2.remove("slug") {
        jf2.insert("mp-slug", slug);
    }
    if !jf2.contains_key("published") {
        jf2.insert("published", now.to_rfc3339());
    }
    Ok(jf2)
}

fn normalize_content(content: Value) -> Result<Value> {
    match content {
        Value::Text(text) => Ok(Value::Object(
            Jf2::new().with("html", text.as_str()).with("text", text),
        )),
        Value::Object(mut object) => {
            let html = object.get("html").cloned();
            let text = object.get("text").cloned();
            match (html, text) {
                (Some(Value::Text(_)), Some(Value::Text(_))) => {}
                (Some(Value::Text(html)), None) => {
                    object.insert("text", html_to_text(&html));
                }
                (None, Some(Value::Text(text))) => {
                    object.insert("html", text);
                }
                _ => {
                    return Err(Error::invalid(
                        "content object must carry a string html or text",
                    ))
                }
            }
            Ok(Value::Object(object))
        }
        Value::List(_) => Err(Error::invalid("content must be a string or an object")),
    }
}

fn normalize_location(location: Value) -> Result<Value> {
    match location {
        Value::Text(uri) => parse_geo_uri(&uri)
            .map(Value::Object)
            .ok_or_else(|| Error::invalid(format!("invalid location string value '{uri}'"))),
        // Already structured, e.g. a stored post being updated or an h-geo.
        Value::Object(object) => Ok(Value::Object(object)),
        Value::List(_) => Err(Error::invalid("location must be a Geo URI or an object")),
    }
}

/// Parses a Geo URI into a location object. Altitude is only set when the
/// URI carries one.
pub fn parse_geo_uri(uri: &str) -> Option<Jf2> {
    let captures = GEO_URI.captures(uri)?;

    let mut location = Jf2::new()
        .with("latitude", &captures["lat"])
        .with("longitude", &captures["lon"]);
    if let Some(altitude) = captures.name("alt") {
        location.insert("altitude", altitude.as_str());
    }
    Some(location)
}

fn normalize_photo(photo: Value) -> Result<Value> {
    let photos = match photo {
        Value::List(items) => items,
        single => vec![single],
    };

    photos
        .into_iter()
        .map(|photo| match photo {
            Value::Text(url) => Ok(Value::Object(Jf2::new().with("value", url).with("alt", ""))),
            Value::Object(mut object) => {
                if !object.contains_key("alt") {
                    object.insert("alt", "");
                }
                Ok(Value::Object(object))
            }
            Value::List(_) => Err(Error::invalid("photo entries must be URLs or objects")),
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}

/// Remove script and style tags from HTML
fn clean_html(html: &str) -> String {
    let html = SCRIPT_TAG.replace_all(html, "");
    STYLE_TAG.replace_all(&html, "").into_owned()
}

/// Whether `value` is a plain decimal number, as used for coordinates.
pub fn is_decimal(value: &str) -> bool {
    DECIMAL_NUMBER.is_match(value)
}

/// Extracts readable plain text from an HTML fragment.
///
/// Block elements start a new line; whitespace inside a line collapses to
/// single spaces and blank lines are dropped.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(&clean_html(html));

    let mut raw = String::new();
    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => raw.push_str(text),
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => raw.push('\n'),
            _ => {}
        }
    }

    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn content_of(jf2: &Jf2) -> (&str, &str) {
        let content = jf2.get("content").and_then(Value::as_object).unwrap();
        (
            content.get_text("html").unwrap(),
            content.get_text("text").unwrap(),
        )
    }

    #[test]
    fn test_scalar_content_fills_html_and_text() {
        let jf2 = normalize(Jf2::entry("entry").with("content", "Hello World"), now()).unwrap();
        assert_eq!(content_of(&jf2), ("Hello World", "Hello World"));
    }

    #[test]
    fn test_html_only_content_derives_text() {
        let content = Jf2::new().with("html", "<p>Hello <em>there</em></p><p>World &amp; co</p>");
        let jf2 = normalize(Jf2::entry("entry").with("content", content), now()).unwrap();
        assert_eq!(
            content_of(&jf2),
            ("<p>Hello <em>there</em></p><p>World &amp; co</p>", "Hello there\nWorld & co")
        );
    }

    #[test]
    fn test_text_only_content_mirrors_into_html() {
        let content = Jf2::new().with("text", "plain <b>not markup</b>");
        let jf2 = normalize(Jf2::entry("entry").with("content", content), now()).unwrap();
        assert_eq!(
            content_of(&jf2),
            ("plain <b>not markup</b>", "plain <b>not markup</b>")
        );
    }

    #[test]
    fn test_invalid_content_shapes() {
        let fixtures = [
            Value::List(vec![Value::from("a"), Value::from("b")]),
            Value::Object(Jf2::new().with("value", "x")),
            Value::Object(Jf2::new().with("html", Value::List(vec![]))),
        ];
        for content in fixtures {
            let err = normalize(Jf2::entry("entry").with("content", content), now()).unwrap_err();
            assert!(err.is_invalid_post());
        }
    }

    #[test]
    fn test_geo_uri_without_altitude() {
        let jf2 = normalize(
            Jf2::entry("entry").with("location", "geo:37.786971,-122.399677"),
            now(),
        )
        .unwrap();

        let want = Jf2::new()
            .with("latitude", "37.786971")
            .with("longitude", "-122.399677");
        assert_eq!(jf2.get("location"), Some(&Value::Object(want)));
    }

    #[test]
    fn test_geo_uri_with_altitude_and_parameters() {
        let location = parse_geo_uri("geo:-33.86,151.2,+12.5;u=35").unwrap();
        assert_eq!(location.get_text("latitude"), Some("-33.86"));
        assert_eq!(location.get_text("longitude"), Some("151.2"));
        assert_eq!(location.get_text("altitude"), Some("+12.5"));
    }

    #[test]
    fn test_invalid_location_strings() {
        for location in ["Berlin", "geo:abc,def", "geo:1", "37.7,-122.3"] {
            let err = normalize(Jf2::entry("entry").with("location", location), now()).unwrap_err();
            assert!(
                err.to_string().contains("invalid location"),
                "location {location}"
            );
        }
    }

    #[test]
    fn test_structured_location_passes_through() {
        let location = Jf2::new().with("latitude", "1").with("longitude", "2");
        let jf2 = normalize(
            Jf2::entry("entry").with("location", location.clone()),
            now(),
        )
        .unwrap();
        assert_eq!(jf2.get("location"), Some(&Value::Object(location)));
    }

    #[test]
    fn test_location_list_is_invalid() {
        let location = Value::List(vec![Value::from("geo:1,2"), Value::from("geo:3,4")]);
        assert!(normalize(Jf2::entry("entry").with("location", location), now()).is_err());
    }

    #[test]
    fn test_scalar_photo_becomes_list() {
        let jf2 = normalize(
            Jf2::entry("entry").with("photo", "https://example.com/a.jpg"),
            now(),
        )
        .unwrap();

        let photo = Jf2::new()
            .with("value", "https://example.com/a.jpg")
            .with("alt", "");
        assert_eq!(
            jf2.get("photo"),
            Some(&Value::List(vec![Value::Object(photo)]))
        );
    }

    #[test]
    fn test_photo_list_keeps_order_and_existing_alt() {
        let photos = Value::List(vec![
            Value::from("https://example.com/a.jpg"),
            Value::Object(
                Jf2::new()
                    .with("value", "https://example.com/b.jpg")
                    .with("alt", "B"),
            ),
        ]);
        let jf2 = normalize(Jf2::entry("entry").with("photo", photos), now()).unwrap();

        let photos = jf2.get("photo").and_then(Value::as_list).unwrap();
        let alts: Vec<&str> = photos
            .iter()
            .filter_map(|photo| photo.as_object()?.get_text("alt"))
            .collect();
        assert_eq!(alts, vec!["", "B"]);
    }

    #[test]
    fn test_slug_moves_to_mp_slug() {
        let jf2 = normalize(Jf2::entry("entry").with("slug", "hello"), now()).unwrap();
        assert!(!jf2.contains_key("slug"));
        assert_eq!(jf2.get_text("mp-slug"), Some("hello"));
    }

    #[test]
    fn test_published_defaults_to_now() {
        let jf2 = normalize(Jf2::entry("entry"), now()).unwrap();
        assert_eq!(jf2.get_text("published"), Some("2024-03-01T12:00:00+00:00"));
    }

    #[test]
    fn test_existing_published_is_kept() {
        let jf2 = normalize(
            Jf2::entry("entry").with("published", "2020-01-01T00:00:00Z"),
            now(),
        )
        .unwrap();
        assert_eq!(jf2.get_text("published"), Some("2020-01-01T00:00:00Z"));
    }

    #[test]
    fn test_unrecognized_properties_pass_through() {
        let jf2 = normalize(
            Jf2::entry("entry").with("syndication", "https://example.com"),
            now(),
        )
        .unwrap();
        assert_eq!(jf2.get_text("syndication"), Some("https://example.com"));
    }

    #[test]
    fn test_html_to_text_drops_scripts_and_styles() {
        let text = html_to_text("<div>Hi<script>alert('x')</script><style>p{}</style></div>");
        assert_eq!(text, "Hi");
    }

    #[test]
    fn test_is_decimal() {
        for value in ["0", "00", "-1.5", "+12.5", "37.786971"] {
            assert!(is_decimal(value), "{value}");
        }
        for value in ["NaN", "inf", "-inf", "1e5", "1.", ".5", "", "1,5"] {
            assert!(!is_decimal(value), "{value}");
        }
    }
}

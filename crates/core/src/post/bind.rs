use chrono::{DateTime, FixedOffset, NaiveDateTime};
use url::Url;

use super::normalize::is_decimal;
use super::{Checkin, Content, Field, Location, Photo, Post, PostType};
use crate::error::{Error, Result};
use crate::microformats::{Jf2, Value};

/// Binds a normalized Jf2 entry onto a [`Post`].
///
/// Properties are read through the [`Field`] table; anything else is
/// ignored. The first missing field, shape mismatch or failed check is
/// reported as [`Error::InvalidPost`].
pub fn bind(jf2: &Jf2, post_type: PostType) -> Result<Post> {
    let mut draft = Draft::default();
    for field in Field::ALL {
        if let Some(value) = jf2.get(field.property()) {
            draft.set(field, value)?;
        }
    }
    draft.finish(post_type)
}

/// A post under construction, with the required fields still optional.
#[derive(Default)]
struct Draft {
    entry_type: Option<String>,
    published: Option<DateTime<FixedOffset>>,
    updated: Option<DateTime<FixedOffset>>,
    content: Option<Content>,
    location: Option<Location>,
    photo: Option<Vec<Photo>>,
    checkin: Option<Checkin>,
    name: Option<String>,
    category: Option<Vec<String>>,
    like_of: Option<String>,
    repost_of: Option<String>,
    bookmark_of: Option<String>,
    in_reply_to: Option<String>,
    slug: Option<String>,
}

impl Draft {
    fn set(&mut self, field: Field, value: &Value) -> Result<()> {
        let property = field.property();
        match field {
            Field::EntryType => self.entry_type = Some(entry_type(value)?),
            Field::Published => self.published = Some(timestamp(property, value)?),
            Field::Updated => self.updated = Some(timestamp(property, value)?),
            Field::Content => self.content = Some(content(value)?),
            Field::Location => self.location = Some(location(value)?),
            Field::Photo => self.photo = Some(photos(value)?),
            Field::Checkin => self.checkin = Some(checkin(value)?),
            Field::Name => self.name = Some(text(property, value)?),
            Field::Category => self.category = categories(value)?,
            Field::LikeOf => self.like_of = Some(text(property, value)?),
            Field::RepostOf => self.repost_of = Some(text(property, value)?),
            Field::BookmarkOf => self.bookmark_of = Some(text(property, value)?),
            Field::InReplyTo => self.in_reply_to = Some(text(property, value)?),
            Field::Slug => self.slug = Some(text(property, value)?),
        }
        Ok(())
    }

    fn finish(self, post_type: PostType) -> Result<Post> {
        Ok(Post {
            post_type,
            entry_type: self
                .entry_type
                .ok_or_else(|| Error::invalid("type is required"))?,
            published: self
                .published
                .ok_or_else(|| Error::invalid("published is required"))?,
            updated: self.updated,
            content: self.content,
            location: self.location,
            photo: self.photo,
            checkin: self.checkin,
            name: self.name,
            category: self.category,
            like_of: self.like_of,
            repost_of: self.repost_of,
            bookmark_of: self.bookmark_of,
            in_reply_to: self.in_reply_to,
            slug: self.slug,
        })
    }
}

fn text(property: &str, value: &Value) -> Result<String> {
    value
        .as_text()
        .map(str::to_string)
        .ok_or_else(|| Error::invalid(format!("{property} must be a single string")))
}

fn object<'a>(property: &str, value: &'a Value) -> Result<&'a Jf2> {
    value
        .as_object()
        .ok_or_else(|| Error::invalid(format!("{property} must be an object")))
}

fn required(object: &Jf2, parent: &str, key: &str) -> Result<String> {
    match object.get(key) {
        Some(value) => text(&format!("{parent} {key}"), value),
        None => Err(Error::invalid(format!("{parent} is missing {key}"))),
    }
}

fn coordinate(object: &Jf2, parent: &str, key: &str) -> Result<String> {
    let coordinate = required(object, parent, key)?;
    check_decimal(parent, key, coordinate)
}

fn optional_coordinate(object: &Jf2, parent: &str, key: &str) -> Result<Option<String>> {
    match object.get(key) {
        Some(value) => {
            let coordinate = text(&format!("{parent} {key}"), value)?;
            check_decimal(parent, key, coordinate).map(Some)
        }
        None => Ok(None),
    }
}

fn check_decimal(parent: &str, key: &str, coordinate: String) -> Result<String> {
    if !is_decimal(&coordinate) {
        return Err(Error::invalid(format!(
            "{parent} {key} '{coordinate}' is not a decimal number"
        )));
    }
    Ok(coordinate)
}

fn entry_type(value: &Value) -> Result<String> {
    let entry_type = text("type", value)?;
    if entry_type != "entry" {
        return Err(Error::invalid(format!(
            "unsupported entry type '{entry_type}'"
        )));
    }
    Ok(entry_type)
}

/// Parses an RFC 3339 timestamp; one without an offset is taken as UTC.
fn timestamp(property: &str, value: &Value) -> Result<DateTime<FixedOffset>> {
    let raw = text(property, value)?;
    DateTime::parse_from_rfc3339(&raw)
        .or_else(|_| {
            NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S")
                .map(|naive| naive.and_utc().fixed_offset())
        })
        .map_err(|_| Error::invalid(format!("{property} '{raw}' is not a valid timestamp")))
}

fn content(value: &Value) -> Result<Content> {
    let content = object("content", value)?;
    Ok(Content {
        html: required(content, "content", "html")?,
        text: required(content, "content", "text")?,
    })
}

fn location(value: &Value) -> Result<Location> {
    let location = object("location", value)?;
    Ok(Location {
        latitude: coordinate(location, "location", "latitude")?,
        longitude: coordinate(location, "location", "longitude")?,
        altitude: optional_coordinate(location, "location", "altitude")?,
    })
}

fn photos(value: &Value) -> Result<Vec<Photo>> {
    let entries = match value {
        Value::List(items) => items.as_slice(),
        single => std::slice::from_ref(single),
    };
    entries.iter().map(photo).collect()
}

fn photo(value: &Value) -> Result<Photo> {
    let (url, alt) = match value {
        Value::Text(url) => (url.clone(), String::new()),
        Value::Object(photo) => {
            let alt = match photo.get("alt") {
                Some(alt) => text("photo alt", alt)?,
                None => String::new(),
            };
            (required(photo, "photo", "value")?, alt)
        }
        Value::List(_) => return Err(Error::invalid("photo entries must be URLs or objects")),
    };

    Url::parse(&url)
        .map_err(|e| Error::invalid(format!("photo value '{url}' is not a valid URL: {e}")))?;

    Ok(Photo { value: url, alt })
}

fn checkin(value: &Value) -> Result<Checkin> {
    let checkin = object("checkin", value)?;
    Ok(Checkin {
        entry_type: required(checkin, "checkin", "type")?,
        name: required(checkin, "checkin", "name")?,
        latitude: coordinate(checkin, "checkin", "latitude")?,
        longitude: coordinate(checkin, "checkin", "longitude")?,
        altitude: optional_coordinate(checkin, "checkin", "altitude")?,
    })
}

/// An empty category list binds as no categories at all.
fn categories(value: &Value) -> Result<Option<Vec<String>>> {
    let categories = match value {
        Value::Text(category) => vec![category.clone()],
        Value::List(items) => items
            .iter()
            .map(|item| text("category", item))
            .collect::<Result<Vec<_>>>()?,
        Value::Object(_) => return Err(Error::invalid("category must be a string or a list")),
    };
    Ok((!categories.is_empty()).then_some(categories))
}

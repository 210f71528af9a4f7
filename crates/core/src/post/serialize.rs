use super::{Checkin, Content, Field, Location, Photo, Post};
use crate::microformats::{Jf2, Value};

impl Post {
    /// Flattens the post back into Jf2.
    ///
    /// Unset fields are left out and structured fields become plain nested
    /// objects. The post type is internal and never emitted.
    pub fn to_jf2(&self) -> Jf2 {
        Field::ALL
            .into_iter()
            .filter_map(|field| {
                self.property(field)
                    .map(|value| (field.property().to_string(), value))
            })
            .collect()
    }

    fn property(&self, field: Field) -> Option<Value> {
        match field {
            Field::EntryType => Some(Value::from(self.entry_type.as_str())),
            Field::Published => Some(Value::Text(self.published.to_rfc3339())),
            Field::Updated => self.updated.map(|updated| Value::Text(updated.to_rfc3339())),
            Field::Content => self.content.as_ref().map(Content::to_value),
            Field::Location => self.location.as_ref().map(Location::to_value),
            Field::Photo => self
                .photo
                .as_ref()
                .map(|photos| Value::List(photos.iter().map(Photo::to_value).collect())),
            Field::Checkin => self.checkin.as_ref().map(Checkin::to_value),
            Field::Name => text(&self.name),
            Field::Category => self.category.as_ref().map(|categories| {
                Value::List(categories.iter().cloned().map(Value::Text).collect())
            }),
            Field::LikeOf => text(&self.like_of),
            Field::RepostOf => text(&self.repost_of),
            Field::BookmarkOf => text(&self.bookmark_of),
            Field::InReplyTo => text(&self.in_reply_to),
            Field::Slug => text(&self.slug),
        }
    }
}

fn text(value: &Option<String>) -> Option<Value> {
    value.clone().map(Value::Text)
}

impl Content {
    fn to_value(&self) -> Value {
        Value::Object(
            Jf2::new()
                .with("html", self.html.as_str())
                .with("text", self.text.as_str()),
        )
    }
}

impl Location {
    fn to_value(&self) -> Value {
        let mut location = Jf2::new()
            .with("latitude", self.latitude.as_str())
            .with("longitude", self.longitude.as_str());
        if let Some(altitude) = &self.altitude {
            location.insert("altitude", altitude.as_str());
        }
        Value::Object(location)
    }
}

impl Photo {
    fn to_value(&self) -> Value {
        Value::Object(
            Jf2::new()
                .with("value", self.value.as_str())
                .with("alt", self.alt.as_str()),
        )
    }
}

impl Checkin {
    fn to_value(&self) -> Value {
        let mut checkin = Jf2::entry(self.entry_type.as_str())
            .with("name", self.name.as_str())
            .with("latitude", self.latitude.as_str())
            .with("longitude", self.longitude.as_str());
        if let Some(altitude) = &self.altitude {
            checkin.insert("altitude", altitude.as_str());
        }
        Value::Object(checkin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::PostType;
    use chrono::DateTime;

    fn post() -> Post {
        Post {
            post_type: PostType::Checkin,
            entry_type: "entry".to_string(),
            published: DateTime::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap(),
            updated: None,
            content: Some(Content {
                html: "<p>Coffee</p>".to_string(),
                text: "Coffee".to_string(),
            }),
            location: None,
            photo: None,
            checkin: Some(Checkin {
                entry_type: "card".to_string(),
                name: "Cafe".to_string(),
                latitude: "52.52".to_string(),
                longitude: "13.40".to_string(),
                altitude: None,
            }),
            name: None,
            category: Some(vec!["coffee".to_string()]),
            like_of: None,
            repost_of: None,
            bookmark_of: None,
            in_reply_to: None,
            slug: None,
        }
    }

    #[test]
    fn test_unset_fields_are_omitted() {
        let jf2 = post().to_jf2();

        let keys: Vec<&str> = jf2.keys().collect();
        assert_eq!(
            keys,
            vec!["category", "checkin", "content", "published", "type"]
        );
    }

    #[test]
    fn test_structured_fields_are_plain_objects() {
        let jf2 = post().to_jf2();

        assert_eq!(
            jf2.get("content"),
            Some(&Value::Object(
                Jf2::new().with("html", "<p>Coffee</p>").with("text", "Coffee")
            ))
        );
        let checkin = jf2.get("checkin").and_then(Value::as_object).unwrap();
        assert_eq!(checkin.entry_type(), Some("card"));
        assert!(!checkin.contains_key("altitude"));
        assert_eq!(
            jf2.get("category"),
            Some(&Value::List(vec![Value::from("coffee")]))
        );
    }

    #[test]
    fn test_timestamps_keep_their_offset() {
        let mut post = post();
        post.updated = Some(DateTime::parse_from_rfc3339("2024-03-02T08:00:00-05:00").unwrap());

        let jf2 = post.to_jf2();

        assert_eq!(jf2.get_text("published"), Some("2024-03-01T12:00:00+02:00"));
        assert_eq!(jf2.get_text("updated"), Some("2024-03-02T08:00:00-05:00"));
    }

    #[test]
    fn test_post_type_is_not_emitted() {
        let jf2 = post().to_jf2();
        assert!(!jf2.contains_key("post-type"));
    }
}

use super::PostType;
use crate::microformats::Jf2;

/// Marker properties and the post type each implies, in priority order.
pub const CLASSIFICATION_ORDER: [(&str, PostType); 6] = [
    ("in-reply-to", PostType::Reply),
    ("bookmark-of", PostType::Bookmark),
    ("like-of", PostType::Like),
    ("repost-of", PostType::Repost),
    ("name", PostType::Article),
    ("checkin", PostType::Checkin),
];

/// Derives the post type from the first marker property present, falling
/// back to a note.
pub fn classify(jf2: &Jf2) -> PostType {
    CLASSIFICATION_ORDER
        .iter()
        .find(|(property, _)| jf2.contains_key(property))
        .map(|(_, post_type)| *post_type)
        .unwrap_or(PostType::Note)
}

/// The fields of a [`Post`](super::Post) and the Jf2 property each one maps
/// to.
///
/// Binding and reverse serialization both walk [`Field::ALL`], so the two
/// directions always agree on names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    EntryType,
    Published,
    Updated,
    Content,
    Location,
    Photo,
    Checkin,
    Name,
    Category,
    LikeOf,
    RepostOf,
    BookmarkOf,
    InReplyTo,
    Slug,
}

impl Field {
    pub const ALL: [Field; 14] = [
        Field::EntryType,
        Field::Published,
        Field::Updated,
        Field::Content,
        Field::Location,
        Field::Photo,
        Field::Checkin,
        Field::Name,
        Field::Category,
        Field::LikeOf,
        Field::RepostOf,
        Field::BookmarkOf,
        Field::InReplyTo,
        Field::Slug,
    ];

    pub const fn property(self) -> &'static str {
        match self {
            Field::EntryType => "type",
            Field::Published => "published",
            Field::Updated => "updated",
            Field::Content => "content",
            Field::Location => "location",
            Field::Photo => "photo",
            Field::Checkin => "checkin",
            Field::Name => "name",
            Field::Category => "category",
            Field::LikeOf => "like-of",
            Field::RepostOf => "repost-of",
            Field::BookmarkOf => "bookmark-of",
            Field::InReplyTo => "in-reply-to",
            Field::Slug => "mp-slug",
        }
    }

    pub fn from_property(property: &str) -> Option<Field> {
        Field::ALL
            .into_iter()
            .find(|field| field.property() == property)
    }
}

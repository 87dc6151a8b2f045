//! Column names of the raw iTunes Search API records and the default column
//! sets each stage operates on.

/// Observation date added by the scraper.
pub const CHECKED_AT: &str = "checked_at";
pub const RELEASE_DATE: &str = "releaseDate";

pub const TRACK_PRICE: &str = "trackPrice";
pub const COLLECTION_PRICE: &str = "collectionPrice";

/// Free-text columns. URL columns are identifiers, not prose, and are left
/// out so the character filter cannot mangle them.
pub const TEXT_COLUMNS: &[&str] = &[
  "wrapperType",
  "kind",
  "artistName",
  "collectionName",
  "trackName",
  "collectionCensoredName",
  "trackCensoredName",
  "collectionArtistName",
  "collectionExplicitness",
  "trackExplicitness",
  "country",
  "currency",
  "primaryGenreName",
  "contentAdvisoryRating",
];

pub const DATE_COLUMNS: &[&str] = &[CHECKED_AT, RELEASE_DATE];

pub const INTEGER_COLUMNS: &[&str] = &[
  "artistId",
  "collectionId",
  "trackId",
  "collectionArtistId",
  "trackTimeMillis",
  "discCount",
  "discNumber",
  "trackCount",
  "trackNumber",
];

pub const BOOLEAN_COLUMN: &str = "isStreamable";

pub const REQUIRED_COLUMNS: &[&str] =
  &["collectionId", "releaseDate", "trackTimeMillis", "isStreamable"];

pub const FILL_TEXT_COLUMNS: &[&str] = &[
  "artistName",
  "collectionName",
  "trackName",
  "collectionCensoredName",
  "trackCensoredName",
  "artistViewUrl",
  "collectionViewUrl",
  "trackViewUrl",
  "previewUrl",
  "collectionArtistName",
  "collectionArtistViewUrl",
  "contentAdvisoryRating",
];

pub const FILL_TEXT_PLACEHOLDER: &str = "Sin identificar";

pub const PRICE_COLUMNS: &[&str] = &[TRACK_PRICE, COLLECTION_PRICE];

pub const SURROGATE_KEY_COLUMN: &str = "collectionArtistId";

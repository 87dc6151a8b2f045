//! SQL schema for the tunecat SQLite store.
//!
//! Executed on every open; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
//! Dates are stored as `YYYY-MM-DD` text, booleans as `0`/`1`.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS artist (
    artist_id     INTEGER PRIMARY KEY,
    artistname    TEXT,
    artistviewurl TEXT
);

-- Store-assigned identifiers; names are unique so reloads are no-ops.
CREATE TABLE IF NOT EXISTS genre (
    genre_id         INTEGER PRIMARY KEY AUTOINCREMENT,
    primarygenrename TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS album (
    collection_id           INTEGER PRIMARY KEY,
    collectionname          TEXT,
    collectioncensoredname  TEXT,
    release_date            TEXT,
    collectionexplicitness  TEXT,
    contentadvisoryrating   TEXT,
    collectionprice         REAL,
    currency                TEXT,
    trackcount              INTEGER,
    disccount               INTEGER,
    collectionviewurl       TEXT,
    collectionartistname    TEXT,
    collectionartistviewurl TEXT,
    artist_id               INTEGER REFERENCES artist(artist_id)
);

CREATE TABLE IF NOT EXISTS track (
    track_id          INTEGER PRIMARY KEY,
    trackname         TEXT,
    tracknumber       INTEGER,
    trackprice        REAL,
    discnumber        INTEGER,
    tracktimemillis   INTEGER,
    trackexplicitness TEXT,
    release_date      TEXT,
    trackviewurl      TEXT,
    is_streamable     INTEGER,
    kind              TEXT,
    artist_id         INTEGER REFERENCES artist(artist_id),
    collection_id     INTEGER REFERENCES album(collection_id),
    genre_id          INTEGER NOT NULL REFERENCES genre(genre_id)
);

-- Price history: append-only, one row per observation.
CREATE TABLE IF NOT EXISTS track_prices (
    track_id   INTEGER NOT NULL REFERENCES track(track_id),
    trackprice REAL    NOT NULL,
    checked_at TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS album_prices (
    collection_id   INTEGER NOT NULL REFERENCES album(collection_id),
    collectionprice REAL    NOT NULL,
    checked_at      TEXT    NOT NULL
);

CREATE INDEX IF NOT EXISTS album_artist_idx        ON album(artist_id);
CREATE INDEX IF NOT EXISTS track_collection_idx    ON track(collection_id);
CREATE INDEX IF NOT EXISTS track_prices_track_idx  ON track_prices(track_id);
CREATE INDEX IF NOT EXISTS album_prices_album_idx  ON album_prices(collection_id);

PRAGMA user_version = 1;
";

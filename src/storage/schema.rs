//! Catalog tables and the statements the workflows issue against them.
//!
//! Statements use `?` placeholders, which both MySQL and SQLite accept.

/// DDL applied when opening a SQLite catalog. The MySQL schema is provisioned out of band.
pub const SQLITE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    userid       INTEGER PRIMARY KEY AUTOINCREMENT,
    email        TEXT NOT NULL,
    lastname     TEXT NOT NULL,
    firstname    TEXT NOT NULL,
    bucketfolder TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS assets (
    assetid   INTEGER PRIMARY KEY AUTOINCREMENT,
    userid    INTEGER NOT NULL REFERENCES users(userid),
    assetname TEXT NOT NULL,
    bucketkey TEXT NOT NULL UNIQUE
);
";

pub const COUNT_USERS: &str = "SELECT COUNT(userid) FROM users";

pub const COUNT_ASSETS: &str = "SELECT COUNT(assetid) FROM assets";

pub const LIST_USERS: &str = "
SELECT userid, email, lastname, firstname, bucketfolder FROM users
ORDER BY userid DESC";

pub const LIST_ASSETS: &str = "
SELECT assetid, userid, assetname, bucketkey FROM assets
ORDER BY assetid DESC";

pub const FIND_ASSET: &str = "SELECT assetname, bucketkey FROM assets WHERE assetid = ?";

pub const FIND_USER_FOLDER: &str = "SELECT userid, bucketfolder FROM users WHERE userid = ?";

pub const INSERT_ASSET: &str = "
INSERT INTO assets(userid, assetname, bucketkey)
VALUES (?, ?, ?)";

pub const INSERT_USER: &str = "
INSERT INTO users(email, lastname, firstname, bucketfolder)
VALUES (?, ?, ?, ?)";

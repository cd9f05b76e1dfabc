//! Catalog service access
//!
//! Request construction for the Open Library API and the schema used to
//! decode its responses.

mod openlibrary;
pub mod schema;

pub use openlibrary::{cover_url, OpenLibrary, COVERS_URL};
pub use schema::{AuthorRecord, BookRecord, DecodeError, SearchPage};

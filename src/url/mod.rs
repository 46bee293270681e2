//! URL handling module for Sumi-Shelf
//!
//! Every link the crawler follows is resolved here with [`url::Url::join`]:
//! category links against the catalog root, "next page" links against the
//! listing page that contained them, and detail links against the catalogue base.

mod resolve;

pub use resolve::{catalogue_base, parse_root_url, resolve_detail_url, resolve_link};

//! Presentational data-table widget.
//!
//! [`DataTable`] holds a list of records and a list of [`Column`]s, filters
//! the records by a free-text search term, and renders the survivors into a
//! [`RenderedTable`] whose `Display` output is an aligned plain-text table.
//!
//! A record matches when any top-level field of its serialized form, taken
//! as text, contains the search term ignoring case. Strings are compared as
//! they are, `null` as empty text, and every other value as its JSON text.
//!
//! # Example
//!
//! ```
//! use amplify_table::{Column, DataTable};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Row {
//!     name: String,
//!     city: String,
//! }
//!
//! let mut table = DataTable::new(
//!     vec![Column::new("Name", "name"), Column::new("City", "city")],
//!     vec![
//!         Row { name: "Alice".into(), city: "Lagos".into() },
//!         Row { name: "Bob".into(), city: "Accra".into() },
//!     ],
//! );
//!
//! table.set_search("la");
//! let rendered = table.render();
//! assert_eq!(rendered.len(), 1);
//! print!("{rendered}");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod column;
pub mod render;
pub mod table;

pub use column::{value_text, Column, Renderer};
pub use render::RenderedTable;
pub use table::DataTable;

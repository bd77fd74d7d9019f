//! GedGraph Core - GEDCOM records and lookups
//!
//! This crate turns a GEDCOM file into individual and family records and
//! answers record-level questions about them: names, vital years, parents,
//! children and the per-family spouse of a parent.
//!
//! Everything here is read-only once loaded. The relationship graph in
//! `gedgraph-graph` is built on top of a [`RecordStore`].
//!
//! # Example
//!
//! ```no_run
//! use gedgraph_core::RecordStore;
//!
//! let store = RecordStore::load("family.ged")?;
//! let person = store.get_individual("@I1@")?;
//! println!("{}", store.get_name(person));
//! # Ok::<(), gedgraph_core::RecordError>(())
//! ```

mod charset;
pub mod error;
mod parser;
mod record;
mod store;

pub use error::{RecordError, Result};
pub use parser::{GedcomParser, ParseResult};
pub use record::{extract_year, Family, Individual, PersonName, Sex, Xref};
pub use store::{Parents, RecordStore, SpouseLink, StoreStats};

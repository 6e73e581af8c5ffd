//! `medreg-import`: snapshot parsing for the registry pipeline.
//!
//! Turns published CSV/ZIP bytes into typed reference entities: per-family
//! charset decoding, header alias resolution, locale-aware row parsing, and
//! one mapper per entity type. Row mappers are pure functions of (row,
//! resolved header, reference cache); everything fallible reports either a
//! dataset-level [`ImportError`] or a row-level [`RowFailure`].

pub mod cache;
pub mod decode;
pub mod error;
pub mod mapper;
pub mod mappers;
pub mod row;
pub mod schema;

pub use cache::ReferenceCache;
pub use decode::{decode_text, parse_table, unzip_member, Charset, Table};
pub use error::ImportError;
pub use mapper::{map_rows, MapContext, MappedTable, RowMapper};
pub use row::{FailureKind, RowFailure, RowView};
pub use schema::{resolve_header, ColumnSpec, HeaderMap};

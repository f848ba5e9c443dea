//! Core module containing the query algebra, records and service seams

pub mod error;
pub mod field;
pub mod filter;
pub mod planner;
pub mod product;
pub mod query;
pub mod sequence;
pub mod service;
pub mod sort;

pub use error::{CatalogError, CatalogResult, ProductError, SourceError, ValidationError};
pub use field::{FieldValue, FilterValue, ProductField};
pub use filter::{Filter, FilterSet, Operator};
pub use product::{NewProduct, Product, ProductPatch, TaggedProduct};
pub use query::{PageSource, PaginationMeta, Query, ResultPage};
pub use sequence::{QuerySequence, QueryTicket};
pub use service::{ProductRepository, ProductSource};
pub use sort::{SortKey, SortOrder};

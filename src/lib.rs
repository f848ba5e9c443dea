//! # Catalog Query
//!
//! Client-side query engine for a product catalog served by a REST
//! collection.
//!
//! ## Features
//!
//! - **Filter Algebra**: `field / operator / value` conditions combined with AND
//! - **Type-Aware Sorting**: stable comparators for id, name, price and stock
//! - **Offset Pagination**: page slices that always report the filtered total
//! - **Offline Fallback**: a deterministic product set served whenever the
//!   remote collection is unreachable or answers garbage
//! - **CRUD Seam**: validated create/read/update/delete against the same
//!   collection
//! - **Configuration-Based**: the remote endpoint is set via YAML, never guessed
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use catalog_query::prelude::*;
//!
//! let config = CatalogConfig::from_yaml_file("catalog.yaml")?;
//! let service = ProductQueryService::from_config(&config);
//!
//! let query = Query::new(1, 5)
//!     .sorted_by(SortKey::asc("price"))
//!     .filtered_by(vec![Filter::greater_than("stock", 10)]);
//!
//! // Never fails: offline data stands in for an unreachable server
//! let page = service.resolve(&query).await;
//! println!("{} of {} products", page.items.len(), page.total);
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Records and queries ===
    pub use crate::core::{
        field::{FieldValue, FilterValue, ProductField},
        filter::{Filter, FilterSet, Operator},
        product::{NewProduct, Product, ProductPatch, TaggedProduct},
        query::{PageSource, PaginationMeta, Query, ResultPage},
        sequence::{QuerySequence, QueryTicket},
        sort::{SortKey, SortOrder},
    };

    // === Service traits ===
    pub use crate::core::service::{ProductRepository, ProductSource};

    // === Errors ===
    pub use crate::core::error::{
        CatalogError, CatalogResult, ConfigError, ProductError, SourceError, ValidationError,
    };

    // === Storage ===
    pub use crate::storage::{FallbackGenerator, InMemoryProductStore, RemoteProductSource};

    // === Config ===
    pub use crate::config::{CatalogConfig, FallbackConfig, RemoteConfig};

    // === Engine ===
    pub use crate::engine::{ProductQueryService, ResolutionPhase};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}

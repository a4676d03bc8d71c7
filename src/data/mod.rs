//! Data layer: core types, loading, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .json / .parquet
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → SalesDataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ SalesDataset  │  Vec<SalesRecord>, option lists
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  FilterRequest → FilteredView
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate  │  KPIs, grouped sums/means
//!   └───────────┘
//!        │
//!        ▼
//!   DashboardReport  (pipeline)
//! ```

pub mod aggregate;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod pipeline;

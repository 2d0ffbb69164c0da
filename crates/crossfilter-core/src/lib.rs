// File: crates/crossfilter-core/src/lib.rs
// Summary: Core library entry point; exports the incremental dimension/group aggregation API.

pub mod aggregator;
pub mod dashboard;
pub mod dimension;
pub mod error;
pub mod filter;
pub mod group;
pub mod key;
pub mod keys;
pub mod labels;
pub mod options;
pub mod record;
pub mod reducer;
pub mod stats;
pub mod types;

pub use aggregator::Aggregator;
pub use dashboard::StockDashboard;
pub use dimension::Dimension;
pub use error::{CrossfilterError, HandleKind, Result};
pub use filter::Filter;
pub use group::{Group, GroupScope};
pub use key::Key;
pub use keys::QuarterConvention;
pub use labels::FilterContext;
pub use options::DashboardOptions;
pub use record::Record;
pub use reducer::{ApproxEq, CountReducer, Reducer, RunningSum, SumReducer};
pub use stats::{IndexAverage, MonthlyIndexAverage, Performance, YearlyPerformance};
pub use types::{DimensionId, FilterDelta, GroupHandle};

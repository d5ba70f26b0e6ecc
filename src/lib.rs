//! Headless explorer for longitudinal wellbeing panel data.
//!
//! A panel of users, nested in groups and observed weekly on several numeric
//! metrics, is loaded once into an immutable [`data::model::Dataset`]. Four
//! view modes ([`view::View`]) map a selection to pure aggregations and emit
//! renderer-agnostic [`chart::ChartSpec`] values; drawing them is an external
//! concern.

pub mod agg;
pub mod chart;
pub mod data;
pub mod error;
pub mod quartile;
pub mod state;
pub mod view;

pub use chart::{ChartKind, ChartSpec, Series};
pub use data::model::{Dataset, Metric, Record};
pub use error::{LoadError, SelectionError};
pub use quartile::Quartile;
pub use state::Session;
pub use view::{View, ViewOutcome};

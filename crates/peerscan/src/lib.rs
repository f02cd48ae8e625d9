//! # peerscan
//!
//! Find the stocks most financially similar to a target.
//!
//! This crate provides a unified interface to the peerscan workspace.
//! Individual components can be enabled via feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: The `SimilarityRanker` trait
//! - `math`: Distances, matrix inversion and VaR
//! - `model`: Pool selection and the two rankers
//! - `utils`: CSV loading and price transforms
//! - `cli`: The `peerscan` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use peerscan::{
//!     model::{PercentageRanker, compare},
//!     primitives::{RatioVector, TargetQuery},
//!     utils::{TableSchema, read_reference_csv},
//! };
//!
//! let table = read_reference_csv("final_df.csv", &TableSchema::default())?;
//! let query = TargetQuery::new(
//!     "CBDK.JK".into(),
//!     "Property & Real Estate".into(),
//!     RatioVector::from_ratios(14.69, 624_462_420_000.0, 35.61),
//! );
//! let outcome = compare(&table, &query, &PercentageRanker::new(), true)?;
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use peerscan_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use peerscan_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use peerscan_math as math;
#[cfg(feature = "model")]
#[doc(inline)]
pub use peerscan_model as model;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use peerscan_utils as utils;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/peerscan/peerscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod linalg;
pub use linalg::{covariance, invert, quadratic_form};

mod distance;
pub use distance::{Mahalanobis, percentage_difference};

mod risk;
pub use risk::{VarBacktest, historical_var, quantile, violation_ratio};

mod error;
pub use error::MathError;

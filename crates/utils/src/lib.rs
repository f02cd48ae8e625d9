#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/peerscan/peerscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod load;
pub use load::{TableSchema, read_reference_csv, reference_table_from_frame};

mod prices;
pub use prices::{BandConfig, column_values, moving_average_band, price_frame, simple_returns};

mod error;
pub use error::UtilsError;

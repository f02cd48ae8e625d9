#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/peerscan/peerscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod stock;
pub use stock::{KNOWN_SECTORS, Sector, StockCode, StockRecord};

mod metric;
pub use metric::{
    FundamentalVector, MahalanobisMetric, MetricCountError, MetricScheme, MetricVector,
    PercentageMetric, RatioVector,
};

mod table;
pub use table::{CandidatePool, PoolScope, ReferenceTable, TargetQuery};

mod score;
pub use score::{RankOutcome, RankedCandidate, RankedResult, Score};

mod prices;
pub use prices::PriceHistory;

/// Re-export common date type.
pub type Date = chrono::NaiveDate;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/peerscan/peerscan/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod pool;
pub use pool::select_pool;

mod percentage;
pub use percentage::{DEFAULT_TOP_N, PercentageConfig, PercentageRanker, rank_by_percentage};

mod mahalanobis;
pub use mahalanobis::{MahalanobisConfig, MahalanobisRanker, rank_by_mahalanobis};

mod comparison;
pub use comparison::{PeerComparison, compare, compare_peers};

mod report;
pub use report::{format_ranking, print_ranking};

mod error;
pub use error::ModelError;

/// Re-export commonly used types.
pub mod prelude {
    pub use peerscan_traits::{RankError, SimilarityRanker};

    pub use super::{
        MahalanobisRanker, ModelError, PeerComparison, PercentageRanker, compare, compare_peers,
    };
}

pub mod ranker;

pub use ranker::{rank, rank_output, Prediction, RankedResult};

pub mod commit_reveal;
pub mod ops;

pub use commit_reveal::{build_commit, build_reveal};
pub use ops::Krc20Operation;

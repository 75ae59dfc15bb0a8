pub mod abi_groups;
pub mod config;
mod error;

pub use {
    abi_groups::{AbiMapping, GroupShape, UnionSummary, run},
    config::UnionConfig,
    error::{Error, ErrorKind, Result},
};

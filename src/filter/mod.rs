//! Approximate membership filters and the source-selection index built from them

pub mod builder;
pub mod index;
pub mod membership;

pub use builder::{BuildReport, DescribedFilter, FilterIndexBuilder};
pub use index::{FilterIndex, FilterSnapshot, SourceFilter};
pub use membership::MembershipFilter;

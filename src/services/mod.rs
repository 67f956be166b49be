pub mod assembler;
pub mod consolidated_view;
pub mod dashboard;
pub mod projections;
pub mod source;

#[cfg(test)]
pub(crate) mod fixtures;

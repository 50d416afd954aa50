/// Filtered copy command.
pub mod copy;
/// Type registry inspection command.
pub mod types;

pub(crate) mod json;
pub(crate) mod load;
pub(crate) mod print;
#[cfg(test)]
pub(crate) mod test_support;
pub(crate) mod util;

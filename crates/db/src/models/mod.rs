pub mod mission;
pub mod spy_cat;
pub mod target;

#[cfg(test)]
pub(crate) mod test_utils;

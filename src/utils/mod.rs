pub mod logger;
pub mod random_utils;
#[cfg(test)]
pub mod test_utils;

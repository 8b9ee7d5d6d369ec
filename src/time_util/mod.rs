pub mod mytime;
pub mod slot_time;

#[cfg(test)]
pub mod test_utils;

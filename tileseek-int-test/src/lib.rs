//! Integration-test support for the tileseek engine.

pub mod test_util;

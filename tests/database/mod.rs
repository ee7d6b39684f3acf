mod test_helpers;
mod transaction_tests;

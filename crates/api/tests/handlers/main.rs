mod appointments_test;
mod availability_test;
mod slots_test;
mod test_utils;

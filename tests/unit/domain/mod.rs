pub mod work_hours_test;

pub mod mock_i2c;
pub mod mock_time;

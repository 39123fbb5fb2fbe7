pub mod log_relay;

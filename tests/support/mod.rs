pub mod listener;
pub mod socket_guard;

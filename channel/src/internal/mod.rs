//! Internal implementation details for the MATFEAP channel.

pub mod transport;

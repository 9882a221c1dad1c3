pub mod booking;
pub mod location;
pub mod one_way_fee;
pub mod payment;
pub mod rate;
pub mod rate_day_range;
pub mod rate_hour_range;
pub mod rate_km_range;
pub mod rate_tier;
pub mod user;
pub mod vehicle;
pub mod vehicle_group;

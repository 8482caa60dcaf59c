pub mod duration;
pub mod pagination;
pub mod phone;
pub mod search;
pub mod soft_delete;
pub mod throttle;

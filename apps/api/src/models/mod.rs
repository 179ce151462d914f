pub mod application;
pub mod candidate;
pub mod job;
pub mod paging;
pub mod profile;
pub mod user;

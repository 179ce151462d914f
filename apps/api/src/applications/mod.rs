// My Gigs job applications: the caller's candidacies joined with their jobs,
// with the completed status derived from resource bookings.

pub mod criteria;
pub mod derivation;
pub mod handlers;
pub mod service;

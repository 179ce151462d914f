// My profile: member record, basic_info trait and recruiting CRM profile
// read and written as one form.

pub mod form;
pub mod handlers;
pub mod service;

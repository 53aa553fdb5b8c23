pub mod advisory_request;
pub mod get_advisory_route;

//! Heuristic extraction of API reference data from parsed HTML.

pub mod endpoints;
pub mod navigation;
pub mod parameters;
pub mod predicates;
pub mod sections;
pub mod siblings;

pub use endpoints::extract_endpoints;
pub use navigation::find_navigation_links;
pub use parameters::parse_parameter_table;
pub use sections::extract_sections;
pub use siblings::FollowingSiblings;

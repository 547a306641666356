pub mod api_docs;

pub use api_docs::{
    DocumentBundle, EndpointRecord, HttpMethod, LinkRecord, ParameterRecord, SectionRecord,
};

pub mod configuration;
pub mod convert;
pub mod http;
pub mod source;
pub mod template;

pub use configuration::Config;
pub use convert::quest_from_graph;
pub use http::HttpContentSource;
pub use source::{
    generate_with_fallback, ContentError, ContentResult, ContentSource, MissionGraph, MissionNode,
    MissionRequest, NodeKind,
};
pub use template::TemplateContentSource;

pub mod parsebot_client;

pub use parsebot_client::{ParseBotClient, documentation_query, format_result};

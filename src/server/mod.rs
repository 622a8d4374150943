pub mod http;

pub use http::SkillServer;

pub mod clock;
pub mod file_source;
pub mod http_client;

pub use clock::SystemClock;
pub use file_source::FileSource;
pub use http_client::HttpSource;

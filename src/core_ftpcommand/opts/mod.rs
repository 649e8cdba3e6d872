mod handler;
pub mod opts_utf8;

pub use handler::Opts;
pub use opts_utf8::OptsUtf8;

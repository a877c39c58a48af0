pub mod decode;
pub mod hash;
pub mod mcp_serve;
pub mod status;
pub mod watch;

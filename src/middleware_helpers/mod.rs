pub mod allowed_hosts;
pub mod request_id;
pub mod security_headers;

pub use allowed_hosts::{allowed_hosts_middleware, AllowedHosts};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;

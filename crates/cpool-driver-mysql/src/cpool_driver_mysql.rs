//! MySQL/MariaDB connection factory

mod connection;
mod factory;
mod settings;
mod tls;

pub use connection::MySqlConnection;
pub use factory::MySqlConnectionFactory;
pub use settings::{MySqlSettings, validate_database_name};
pub use tls::skip_verify_ssl_opts;

use crate::sql::{
    base::{
        adapter::{DatabaseKind, SqlAdapter},
        error::ConnectorError,
    },
    mysql::adapter::MySqlAdapter,
    postgres::adapter::PgAdapter,
};
use std::{sync::Arc, time::Duration};
use tokio_postgres::config::SslMode;

/// Everything needed to reach one database endpoint. Loaded once at startup
/// from the process environment; no value in here changes during a run.
#[derive(Debug, Clone)]
pub struct Endpoint {
    pub kind: DatabaseKind,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub encrypt: bool,
    pub timeout: Duration,
}

impl Endpoint {
    /// Opens a fresh connection to this endpoint. Callers cache the handle;
    /// this method does not.
    pub async fn connect(&self) -> Result<Arc<dyn SqlAdapter>, ConnectorError> {
        match self.kind {
            DatabaseKind::Postgres => Ok(Arc::new(PgAdapter::connect(self.pg_config()).await?)),
            DatabaseKind::MySql => Ok(Arc::new(MySqlAdapter::connect(self.mysql_opts()).await?)),
        }
    }

    fn pg_config(&self) -> tokio_postgres::Config {
        let mut config = tokio_postgres::Config::new();
        config
            .host(&self.host)
            .port(self.port)
            .dbname(&self.database)
            .user(&self.user)
            .password(&self.password)
            .connect_timeout(self.timeout)
            .ssl_mode(if self.encrypt {
                SslMode::Require
            } else {
                SslMode::Disable
            });
        config
    }

    fn mysql_opts(&self) -> mysql_async::Opts {
        let mut builder = mysql_async::OptsBuilder::default()
            .ip_or_hostname(self.host.clone())
            .tcp_port(self.port)
            .db_name(Some(self.database.clone()))
            .user(Some(self.user.clone()))
            .pass(Some(self.password.clone()))
            .tcp_connect_timeout(Some(self.timeout));
        if self.encrypt {
            builder = builder.ssl_opts(Some(mysql_async::SslOpts::default()));
        }
        builder.into()
    }
}

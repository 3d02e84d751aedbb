//! Embedded PostgreSQL context shared by the Diesel adapter suites.
//!
//! Each suite compiles this module separately. [`PgContext`] owns a Tokio
//! runtime, a pool and a throwaway database cloned from the migrated
//! template, and the suites drive the async repositories through
//! [`PgContext::block_on`].

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod pg_embed;

use std::future::Future;

use carmarket::domain::NewCar;
use carmarket::outbound::persistence::{DbPool, PoolConfig};
use pg_embedded_setup_unpriv::TemporaryDatabase;
use tokio::runtime::Runtime;

use cluster_skip::handle_cluster_setup_failure;
use embedded_postgres::provision_template_database;
use pg_embed::shared_cluster;

/// Runtime, pool and database for one test.
///
/// Fields drop in declaration order: the runtime ends the connection tasks
/// before the database guard drops the database.
pub struct PgContext {
    runtime: Runtime,
    pool: DbPool,
    _database: TemporaryDatabase,
}

impl PgContext {
    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}

fn setup_pg_context() -> Result<PgContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let database = provision_template_database(cluster).map_err(|err| err.to_string())?;

    let config = PoolConfig::new(database.url()).with_max_size(2);
    let pool = runtime
        .block_on(DbPool::new(config))
        .map_err(|err| err.to_string())?;

    Ok(PgContext {
        runtime,
        pool,
        _database: database,
    })
}

/// Fresh database for one test, or `None` when the cluster is unavailable
/// and `SKIP_TEST_CLUSTER` is set.
pub fn pg_context() -> Option<PgContext> {
    match setup_pg_context() {
        Ok(context) => Some(context),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

/// A valid listing with the given make, model and price.
pub fn sample_car(make: &str, model: &str, price: i64) -> NewCar {
    NewCar {
        make: make.to_owned(),
        model: model.to_owned(),
        year: 2019,
        mileage: 42_000,
        price,
        fuel_type: "Petrol".to_owned(),
        transmission: "Manual".to_owned(),
        body_type: "Hatchback".to_owned(),
        available: true,
    }
}

mod memory;
mod models;
mod postgres;
mod querier;
mod store;

pub use self::{
    memory::MemoryDb,
    models::{PostRow, SiteSetupRow},
    postgres::{DBPool, init_db, migrate, new_db_pool},
    querier::Querier,
    store::Store,
};

use clap::Subcommand;
use engine::tables;
use model::descriptor::TableDescriptor;

#[derive(Subcommand, Clone, Copy)]
pub enum Commands {
    /// Run the main table set; the bulk stock snapshot has its own schedule
    Sync,
    /// Run only the bulk stock snapshot
    SyncBulk,
    /// Run the main table set, bulk excluded; same as plain `sync`
    SyncMain,
    /// Ping both databases and report whether notifications are configured
    TestConn,
}

impl Commands {
    /// Tables a run command covers. The bulk snapshot is reachable only
    /// through `sync-bulk`; the scheduler fires plain `sync` far too often
    /// for the bulk table to ride along.
    pub fn descriptors(self) -> Vec<TableDescriptor> {
        match self {
            Commands::Sync | Commands::SyncMain => tables::main_tables(),
            Commands::SyncBulk => tables::bulk_tables(),
            Commands::TestConn => Vec::new(),
        }
    }
}

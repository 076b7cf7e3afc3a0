// Adapters layer: concrete collaborators behind the domain ports (CSV parsing,
// LLM client, PDF rendering, report storage).

pub mod anthropic;
pub mod csv_reader;
pub mod pdf;
pub mod sinks;
pub mod store;

pub use anthropic::AnthropicInsights;
pub use csv_reader::read_transactions;
pub use sinks::{FileSink, StoreSink};
pub use store::InMemoryReportStore;

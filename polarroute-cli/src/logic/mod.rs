pub mod reports;
pub mod route_report;
pub mod seeds;
pub mod tester;

pub use route_report::{RouteReport, fingerprint};
pub use seeds::{DEFAULT_SEED, SeedInfo, parse_seed_token, resolve_seed_inputs};
pub use tester::*;

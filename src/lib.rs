//! Shared library for the `ceph-export` tool.
//!
//! The crate gathers connection facts from a running Ceph cluster (fsid,
//! monitors, managers, gateways, dashboard/metrics URLs, a client secret and
//! the release) and writes them as JSON or YAML for an import process. The
//! binary is a thin shell over [`pipeline::run`]; the modules here are the
//! stages it strings together.

pub mod cli;
pub mod cluster;
pub mod environment;
pub mod error;
pub mod export;
pub mod ini;
pub mod keyring;
pub mod pipeline;
pub mod record;
pub mod runtime;
pub mod schema;
pub mod settings;
pub mod status;
pub mod version;

pub use cluster::{ClusterCli, SystemCli};
pub use error::{EXIT_FAILURE_CODE, ExportError};
pub use pipeline::{Context, run};
pub use record::ExportRecord;
pub use settings::{OutputFormat, Settings};
pub use status::{HostResolver, SystemResolver};

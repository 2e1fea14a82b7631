//! Walks `ceph -s -f json` output and pulls out the exported facts.
//!
//! The status document is decoded into a generic `serde_json::Value` rather
//! than a fixed schema: it has many optional, release-dependent sections and
//! only a handful of paths matter here. Every access goes through a typed
//! accessor that reports the dotted path on a shape mismatch, so a layout the
//! mapper does not understand surfaces as [`ExportError::Schema`].

use std::net::ToSocketAddrs;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use crate::error::{ExportError, Result};
use crate::record::ExportRecord;

/// Manager module that must be enabled for the metrics URL to mean anything.
pub const METRICS_MODULE: &str = "prometheus";

/// Service-map daemon entry that aggregates the others.
const SUMMARY_DAEMON: &str = "summary";
const FRONTEND_CONFIG_KEY: &str = "frontend_config#0";

/// Resolves a host name to its first address.
pub trait HostResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// Resolver backed by the system's name service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    fn resolve(&self, name: &str) -> Option<String> {
        (name, 0)
            .to_socket_addrs()
            .ok()?
            .next()
            .map(|addr| addr.ip().to_string())
    }
}

impl<F> HostResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Crude address check: the name is taken to be an address when its first
/// character is a decimal digit.
pub fn looks_like_ip(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// Facts mapped from the status tree, before secret and version are known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterFacts {
    pub fsid: String,
    pub mons: Vec<String>,
    pub mgr: String,
    pub mgr_standby: Vec<String>,
    pub enabled_modules: Vec<String>,
    pub dashboard_url: String,
    pub prometheus_url: String,
    pub rgws: Vec<String>,
}

impl ClusterFacts {
    pub fn has_module(&self, name: &str) -> bool {
        self.enabled_modules.iter().any(|module| module == name)
    }

    /// Fail unless the metrics module is enabled on the managers.
    pub fn ensure_metrics_enabled(&self) -> Result<()> {
        if self.has_module(METRICS_MODULE) {
            Ok(())
        } else {
            Err(ExportError::Precondition(
                "Prometheus module must be enabled, prior to configuration export".to_string(),
            ))
        }
    }

    pub fn into_record(self, secret: String, version: String) -> ExportRecord {
        ExportRecord {
            dashboard_url: self.dashboard_url,
            fsid: self.fsid,
            secret,
            mgr: self.mgr,
            mgr_standby: self.mgr_standby,
            mons: self.mons,
            prometheus_url: self.prometheus_url,
            rgws: self.rgws,
            version,
        }
    }
}

/// Decode raw status output into a generic tree.
pub fn parse_status(raw: &str) -> Result<Value> {
    serde_json::from_str(raw)
        .map_err(|err| ExportError::Parse(format!("Unable to parse the json output from Ceph: {err}")))
}

/// Map the status tree onto [`ClusterFacts`].
pub fn map_status(status: &Value, resolver: &dyn HostResolver) -> Result<ClusterFacts> {
    let root = as_object(status, "<root>")?;
    let mut facts = ClusterFacts::default();

    if let Some(monmap) = root.get("monmap") {
        map_monmap(monmap, &mut facts)?;
    }
    if let Some(mgrmap) = root.get("mgrmap") {
        map_mgrmap(mgrmap, resolver, &mut facts)?;
    }
    if let Some(servicemap) = root.get("servicemap") {
        map_servicemap(servicemap, &mut facts)?;
    }

    facts.fsid = as_str(required(root, "fsid", "fsid")?, "fsid")?.to_string();
    debug!(
        fsid = %facts.fsid,
        mons = facts.mons.len(),
        standbys = facts.mgr_standby.len(),
        rgws = facts.rgws.len(),
        "mapped cluster status"
    );
    Ok(facts)
}

fn map_monmap(monmap: &Value, facts: &mut ClusterFacts) -> Result<()> {
    let monmap = as_object(monmap, "monmap")?;
    let Some(mons) = monmap.get("mons") else {
        return Ok(());
    };
    for (idx, mon) in as_array(mons, "monmap.mons")?.iter().enumerate() {
        let path = format!("monmap.mons[{idx}]");
        let mon = as_object(mon, &path)?;
        let addr_path = format!("{path}.addr");
        let addr = as_str(required(mon, "addr", &addr_path)?, &addr_path)?;
        facts.mons.push(addr.to_string());
    }
    Ok(())
}

fn map_mgrmap(mgrmap: &Value, resolver: &dyn HostResolver, facts: &mut ClusterFacts) -> Result<()> {
    let mgrmap = as_object(mgrmap, "mgrmap")?;

    if let Some(active) = mgrmap.get("active_addr") {
        let active = as_str(active, "mgrmap.active_addr")?;
        facts.mgr = active.split(':').next().unwrap_or_default().to_string();
    }

    if let Some(standbys) = mgrmap.get("standbys") {
        for (idx, standby) in as_array(standbys, "mgrmap.standbys")?.iter().enumerate() {
            let path = format!("mgrmap.standbys[{idx}]");
            let standby = as_object(standby, &path)?;
            let name_path = format!("{path}.name");
            let name = as_str(required(standby, "name", &name_path)?, &name_path)?;
            facts.mgr_standby.push(resolve_standby(name, resolver));
        }
    }

    if let Some(modules) = mgrmap.get("modules") {
        for (idx, module) in as_array(modules, "mgrmap.modules")?.iter().enumerate() {
            let module = as_str(module, &format!("mgrmap.modules[{idx}]"))?;
            facts.enabled_modules.push(module.to_string());
        }
    }

    if let Some(services) = mgrmap.get("services") {
        let services = as_object(services, "mgrmap.services")?;
        if let Some(url) = services.get("dashboard") {
            facts.dashboard_url = as_str(url, "mgrmap.services.dashboard")?.to_string();
        }
        if let Some(url) = services.get("prometheus") {
            facts.prometheus_url = as_str(url, "mgrmap.services.prometheus")?.to_string();
        }
    }
    Ok(())
}

fn resolve_standby(name: &str, resolver: &dyn HostResolver) -> String {
    if looks_like_ip(name) {
        return name.to_string();
    }
    match resolver.resolve(name) {
        Some(addr) => {
            trace!(name, addr = %addr, "resolved standby manager");
            addr
        }
        None => {
            warn!(name, "standby manager name did not resolve, keeping it");
            name.to_string()
        }
    }
}

fn map_servicemap(servicemap: &Value, facts: &mut ClusterFacts) -> Result<()> {
    let servicemap = as_object(servicemap, "servicemap")?;
    let services = as_object(
        required(servicemap, "services", "servicemap.services")?,
        "servicemap.services",
    )?;
    let Some(rgw) = services.get("rgw") else {
        return Ok(());
    };
    let rgw = as_object(rgw, "servicemap.services.rgw")?;
    let daemons = as_object(
        required(rgw, "daemons", "servicemap.services.rgw.daemons")?,
        "servicemap.services.rgw.daemons",
    )?;

    for (name, daemon) in daemons {
        if name == SUMMARY_DAEMON {
            continue;
        }
        let path = format!("servicemap.services.rgw.daemons.{name}");
        let daemon = as_object(daemon, &path)?;
        let meta_path = format!("{path}.metadata");
        let metadata = as_object(required(daemon, "metadata", &meta_path)?, &meta_path)?;
        let frontend_path = format!("{meta_path}.{FRONTEND_CONFIG_KEY}");
        let frontend = as_str(
            required(metadata, FRONTEND_CONFIG_KEY, &frontend_path)?,
            &frontend_path,
        )?;
        facts.rgws.extend(frontend_ports(frontend, &frontend_path)?);
    }
    Ok(())
}

/// Values of every `*port=value` token in a gateway frontend config.
pub fn frontend_ports(frontend: &str, path: &str) -> Result<Vec<String>> {
    let mut ports = Vec::new();
    for token in frontend.split(' ') {
        let mut parts = token.split('=');
        let key = parts.next().unwrap_or_default();
        if !key.ends_with("port") {
            continue;
        }
        match parts.next() {
            Some(value) => ports.push(value.to_string()),
            None => return Err(ExportError::schema(path, "'port=value' token", "bare 'port'")),
        }
    }
    Ok(ports)
}

/// JSON type names used in schema errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl Kind {
    fn of(value: &Value) -> Self {
        match value {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::String(_) => Kind::String,
            Value::Number(_) => Kind::Number,
            Value::Bool(_) => Kind::Bool,
            Value::Null => Kind::Null,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Bool => "bool",
            Kind::Null => "null",
        }
    }
}

fn mismatch(value: &Value, path: &str, expected: Kind) -> ExportError {
    ExportError::schema(path, expected.label(), Kind::of(value).label())
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| mismatch(value, path, Kind::Object))
}

fn as_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| mismatch(value, path, Kind::Array))
}

fn as_str<'a>(value: &'a Value, path: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| mismatch(value, path, Kind::String))
}

fn required<'a>(map: &'a Map<String, Value>, key: &str, path: &str) -> Result<&'a Value> {
    map.get(key)
        .ok_or_else(|| ExportError::schema(path, "a value", "nothing"))
}

use crate::{PropertySpec, ServiceDescriptor, ThingSpec, SERVICES};
use host_telemetry::{Metric, MetricSource};
use net_reach::InterfaceSource;
use std::net::IpAddr;
use tracing::{debug, warn};

/// Fixed metric properties (read-only) plus one service per registered command.
pub fn describe_metrics(source: &dyn MetricSource) -> ThingSpec {
    let properties = source
        .list_metrics()
        .into_iter()
        .map(|id| match Metric::from_name(id) {
            Some(metric) => {
                let d = metric.descriptor();
                let mut p = PropertySpec::create(d.id, d.name, Some(d.data_type), 0, None);
                if let (Some(unit), Some(unit_name)) = (d.unit, d.unit_name) {
                    p.data_type = p.data_type.map(|t| t.with_unit(unit, unit_name));
                }
                p.read_only()
            }
            None => PropertySpec::create(id, id, None, 0, None).read_only(),
        })
        .collect();

    ThingSpec {
        properties,
        services: SERVICES.iter().map(ServiceDescriptor::to_spec).collect(),
    }
}

/// One probe property per distinct gateway and IPv4 DNS server of the local interfaces.
///
/// The first address of each class is `Gateway` / `Dns`, later ones `Gateway2`,
/// `Dns2`, ... in enumeration order. An enumeration failure yields an empty spec.
pub fn describe_network(source: &dyn InterfaceSource) -> ThingSpec {
    let interfaces = match source.interfaces() {
        Ok(list) => list,
        Err(e) => {
            warn!("interface enumeration failed: {e}");
            return ThingSpec::default();
        }
    };

    let mut gateways = AddressClass::new("Gateway");
    let mut dns = AddressClass::new("Dns");
    let mut properties = Vec::new();
    for iface in &interfaces {
        for gw in &iface.gateways {
            if let Some(id) = gateways.claim(*gw) {
                properties.push(probe_property(&id, &format!("{} gateway", iface.name), gw));
            }
        }
        for server in iface.dns_servers.iter().filter(|a| a.is_ipv4()) {
            if let Some(id) = dns.claim(*server) {
                properties.push(probe_property(&id, &format!("{} DNS", iface.name), server));
            }
        }
    }
    debug!(
        interfaces = interfaces.len(),
        properties = properties.len(),
        "network discovery"
    );

    ThingSpec {
        properties,
        services: Vec::new(),
    }
}

fn probe_property(id: &str, name: &str, addr: &IpAddr) -> PropertySpec {
    let mut p = PropertySpec::create(id, name, Some("int"), 0, Some(&addr.to_string()));
    p.data_type = p.data_type.map(|t| t.with_unit("ms", "milliseconds"));
    p
}

struct AddressClass {
    prefix: &'static str,
    seen: Vec<IpAddr>,
}

impl AddressClass {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            seen: Vec::new(),
        }
    }

    // Returns the property id for a first sighting, None for a duplicate.
    fn claim(&mut self, addr: IpAddr) -> Option<String> {
        if self.seen.contains(&addr) {
            return None;
        }
        self.seen.push(addr);
        Some(match self.seen.len() {
            1 => self.prefix.to_string(),
            n => format!("{}{n}", self.prefix),
        })
    }
}

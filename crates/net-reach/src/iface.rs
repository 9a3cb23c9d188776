use crate::{InterfaceInfo, InterfaceSource, ProbeError, Result};
use std::fs;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Interface enumeration from Linux procfs routing tables and `resolv.conf`.
///
/// Gateways come from `/proc/net/route` and `/proc/net/ipv6_route`. The system
/// resolver is not per-interface, so its nameservers are attached to every
/// interface that carries a default route.
pub struct ProcNetInterfaces {
    route: PathBuf,
    ipv6_route: PathBuf,
    resolv_conf: PathBuf,
}

impl ProcNetInterfaces {
    pub fn new() -> Self {
        Self {
            route: "/proc/net/route".into(),
            ipv6_route: "/proc/net/ipv6_route".into(),
            resolv_conf: "/etc/resolv.conf".into(),
        }
    }

    pub fn with_paths(
        route: impl Into<PathBuf>,
        ipv6_route: impl Into<PathBuf>,
        resolv_conf: impl Into<PathBuf>,
    ) -> Self {
        Self {
            route: route.into(),
            ipv6_route: ipv6_route.into(),
            resolv_conf: resolv_conf.into(),
        }
    }
}

impl Default for ProcNetInterfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl InterfaceSource for ProcNetInterfaces {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        let v4 = fs::read_to_string(&self.route).map_err(|e| {
            ProbeError::Io(format!("reading {}: {e}", self.route.display()))
        })?;
        // Hosts without IPv6 have no ipv6_route; hosts without a resolver have no resolv.conf.
        let v6 = fs::read_to_string(&self.ipv6_route).unwrap_or_default();
        let resolv = match fs::read_to_string(&self.resolv_conf) {
            Ok(s) => s,
            Err(e) => {
                warn!("reading {}: {e}", self.resolv_conf.display());
                String::new()
            }
        };

        let mut routes = parse_ipv4_routes(&v4);
        routes.extend(parse_ipv6_routes(&v6));
        let out = assemble(routes, parse_resolv_conf(&resolv));
        debug!(count = out.len(), "enumerated interfaces");
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Route {
    pub iface: String,
    pub gateway: Option<IpAddr>,
    pub default: bool,
}

pub(crate) fn parse_ipv4_routes(text: &str) -> Vec<Route> {
    text.lines()
        .skip(1)
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 8 {
                return None;
            }
            let dest = u32::from_str_radix(cols[1], 16).ok()?;
            let gw = u32::from_str_radix(cols[2], 16).ok()?;
            let mask = u32::from_str_radix(cols[7], 16).ok()?;
            // procfs prints addresses in host byte order of a little-endian kernel
            let gateway = (gw != 0).then(|| IpAddr::V4(Ipv4Addr::from(gw.to_le_bytes())));
            Some(Route {
                iface: cols[0].to_string(),
                gateway,
                default: dest == 0 && mask == 0,
            })
        })
        .collect()
}

pub(crate) fn parse_ipv6_routes(text: &str) -> Vec<Route> {
    text.lines()
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < 10 {
                return None;
            }
            let dest_len = u8::from_str_radix(cols[1], 16).ok()?;
            let next_hop = u128::from_str_radix(cols[4], 16).ok()?;
            let iface = cols[9];
            if iface == "lo" {
                return None;
            }
            let gateway = (next_hop != 0).then(|| IpAddr::V6(Ipv6Addr::from(next_hop)));
            Some(Route {
                iface: iface.to_string(),
                gateway,
                default: dest_len == 0,
            })
        })
        .collect()
}

pub(crate) fn parse_resolv_conf(text: &str) -> Vec<IpAddr> {
    text.lines()
        .map(|l| l.split(['#', ';']).next().unwrap_or_default())
        .filter_map(|l| {
            let mut parts = l.split_whitespace();
            if parts.next()? != "nameserver" {
                return None;
            }
            // strip an IPv6 zone suffix such as fe80::1%eth0
            let addr = parts.next()?.split('%').next()?;
            addr.parse().ok()
        })
        .collect()
}

fn assemble(routes: Vec<Route>, dns: Vec<IpAddr>) -> Vec<InterfaceInfo> {
    let mut out: Vec<InterfaceInfo> = Vec::new();
    let mut has_default: Vec<bool> = Vec::new();
    for route in routes {
        let idx = match out.iter().position(|i| i.name == route.iface) {
            Some(idx) => idx,
            None => {
                out.push(InterfaceInfo {
                    name: route.iface.clone(),
                    ..InterfaceInfo::default()
                });
                has_default.push(false);
                out.len() - 1
            }
        };
        if let Some(gw) = route.gateway {
            if !out[idx].gateways.contains(&gw) {
                out[idx].gateways.push(gw);
            }
        }
        has_default[idx] |= route.default;
    }

    let mut attached = false;
    for (info, default) in out.iter_mut().zip(has_default) {
        if default {
            info.dns_servers = dns.clone();
            attached = true;
        }
    }
    if !attached && !dns.is_empty() {
        out.push(InterfaceInfo {
            name: "resolver".to_string(),
            gateways: Vec::new(),
            dns_servers: dns,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUTE: &str = "\
Iface\tDestination\tGateway \tFlags\tRefCnt\tUse\tMetric\tMask\t\tMTU\tWindow\tIRTT
eth0\t00000000\t0101A8C0\t0003\t0\t0\t100\t00000000\t0\t0\t0
eth0\t0001A8C0\t00000000\t0001\t0\t0\t100\t00FFFFFF\t0\t0\t0
docker0\t000011AC\t00000000\t0001\t0\t0\t0\t0000FFFF\t0\t0\t0
wlan0\t00000000\t0101A8C0\t0003\t0\t0\t600\t00000000\t0\t0\t0
";

    const IPV6_ROUTE: &str = "\
00000000000000000000000000000000 00 00000000000000000000000000000000 00 fe800000000000000000000000000001 00000400 00000001 00000000 00000003     eth0
fe800000000000000000000000000000 40 00000000000000000000000000000000 00 00000000000000000000000000000000 00000100 00000001 00000000 00000001     eth0
00000000000000000000000000000001 80 00000000000000000000000000000000 00 00000000000000000000000000000000 00000000 00000002 00000000 80200001       lo
";

    #[test]
    fn decodes_ipv4_gateways() -> anyhow::Result<()> {
        let routes = parse_ipv4_routes(ROUTE);
        assert_eq!(routes.len(), 4);
        assert_eq!(routes[0].iface, "eth0");
        assert_eq!(routes[0].gateway, Some("192.168.1.1".parse::<IpAddr>()?));
        assert!(routes[0].default);
        assert_eq!(routes[1].gateway, None);
        assert!(!routes[1].default);
        Ok(())
    }

    #[test]
    fn decodes_ipv6_next_hops_and_skips_loopback() -> anyhow::Result<()> {
        let routes = parse_ipv6_routes(IPV6_ROUTE);
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].gateway, Some("fe80::1".parse::<IpAddr>()?));
        assert!(routes[0].default);
        Ok(())
    }

    #[test]
    fn reads_nameservers() -> anyhow::Result<()> {
        let conf = "# generated\nnameserver 10.0.0.53\nnameserver fe80::1%eth0 ; zone\nsearch lan\noptions edns0\n";
        let dns = parse_resolv_conf(conf);
        assert_eq!(
            dns,
            vec![
                "10.0.0.53".parse::<IpAddr>()?,
                "fe80::1".parse::<IpAddr>()?
            ]
        );
        Ok(())
    }

    #[test]
    fn attaches_resolver_to_default_route_interfaces() -> anyhow::Result<()> {
        let mut routes = parse_ipv4_routes(ROUTE);
        routes.extend(parse_ipv6_routes(IPV6_ROUTE));
        let dns: Vec<IpAddr> = vec!["10.0.0.53".parse::<IpAddr>()?];
        let ifs = assemble(routes, dns.clone());

        let names: Vec<&str> = ifs.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["eth0", "docker0", "wlan0"]);
        assert_eq!(ifs[0].gateways.len(), 2);
        assert_eq!(ifs[0].dns_servers, dns);
        assert!(ifs[1].gateways.is_empty());
        assert!(ifs[1].dns_servers.is_empty());
        assert_eq!(ifs[2].dns_servers, dns);
        Ok(())
    }

    #[test]
    fn resolver_without_default_route_still_listed() -> anyhow::Result<()> {
        let ifs = assemble(Vec::new(), vec!["1.1.1.1".parse::<IpAddr>()?]);
        assert_eq!(ifs.len(), 1);
        assert_eq!(ifs[0].name, "resolver");
        Ok(())
    }

    #[test]
    fn missing_route_table_is_an_error() {
        let src = ProcNetInterfaces::with_paths("/nonexistent/route", "/nonexistent/v6", "/nonexistent/resolv");
        assert!(matches!(src.interfaces(), Err(ProbeError::Io(_))));
    }
}

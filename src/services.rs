//! Well-known service names for TCP ports.
//!
//! Names come from the system services database (`/etc/services`) when it
//! is readable, falling back to a built-in table of common ports. A failed
//! lookup never affects a scan result; it only yields [`UNKNOWN_SERVICE`].

use crate::types::Port;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// Placeholder used when no name is known for a port.
pub const UNKNOWN_SERVICE: &str = "unknown service";

/// Location of the system services database.
const SYSTEM_SERVICES_FILE: &str = "/etc/services";

/// TCP entries loaded from the system services database.
static SYSTEM_SERVICES: LazyLock<HashMap<u16, String>> =
    LazyLock::new(|| load_services_file(Path::new(SYSTEM_SERVICES_FILE)));

/// Built-in fallback of well-known TCP ports, used when the system database
/// has no entry.
#[rustfmt::skip]
const WELL_KNOWN: &[(u16, &str)] = &[
    (20, "ftp-data"), (21, "ftp"), (22, "ssh"), (23, "telnet"), (25, "smtp"), (53, "domain"),
    (67, "bootps"), (68, "bootpc"), (69, "tftp"), (80, "http"), (88, "kerberos"), (110, "pop3"),
    (111, "rpcbind"), (119, "nntp"), (123, "ntp"), (135, "msrpc"), (137, "netbios-ns"),
    (138, "netbios-dgm"), (139, "netbios-ssn"), (143, "imap"), (161, "snmp"), (162, "snmptrap"),
    (179, "bgp"), (194, "irc"), (389, "ldap"), (443, "https"), (445, "microsoft-ds"),
    (464, "kpasswd"), (465, "smtps"), (500, "isakmp"), (513, "rlogin"), (514, "shell"),
    (515, "printer"), (520, "rip"), (521, "ripng"), (523, "ibm-db2"), (543, "klogin"),
    (544, "kshell"), (548, "afp"), (554, "rtsp"), (587, "submission"), (631, "ipp"),
    (636, "ldaps"), (873, "rsync"), (902, "vmware-auth"), (993, "imaps"), (995, "pop3s"),
    (1080, "socks"), (1194, "openvpn"), (1433, "ms-sql-s"), (1434, "ms-sql-m"),
    (1521, "oracle"), (1701, "l2tp"), (1723, "pptp"), (1812, "radius"), (1813, "radius-acct"),
    (1883, "mqtt"), (2049, "nfs"), (2082, "cpanel"), (2083, "cpanel-ssl"), (2086, "whm"),
    (2087, "whm-ssl"), (2181, "zookeeper"), (2375, "docker"), (2376, "docker-ssl"),
    (3000, "grafana"), (3128, "squid"), (3268, "globalcat"), (3269, "globalcat-ssl"),
    (3306, "mysql"), (3389, "ms-wbt-server"), (3690, "svn"), (4369, "epmd"), (4443, "pharos"),
    (5000, "upnp"), (5060, "sip"), (5061, "sips"), (5222, "xmpp-client"), (5269, "xmpp-server"),
    (5432, "postgresql"), (5672, "amqp"), (5900, "vnc"), (5984, "couchdb"), (6379, "redis"),
    (6443, "kubernetes-api"), (6666, "irc"), (6667, "irc"), (7001, "weblogic"),
    (7077, "spark-master"), (8000, "http-alt"), (8008, "http-alt"), (8080, "http-proxy"),
    (8081, "http-alt"), (8082, "http-alt"), (8083, "http-alt"), (8443, "https-alt"),
    (8888, "http-alt"), (9000, "cslistener"), (9042, "cassandra"), (9090, "prometheus"),
    (9092, "kafka"), (9200, "elasticsearch"), (9300, "elasticsearch-cluster"), (9418, "git"),
    (10000, "webmin"), (11211, "memcached"), (15672, "rabbitmq-mgmt"), (27017, "mongodb"),
    (27018, "mongodb"), (27019, "mongodb"), (28017, "mongodb-web"), (50000, "db2"),
    (50070, "hdfs-namenode"), (50075, "hdfs-datanode"),
];

static PORT_SERVICES: LazyLock<HashMap<u16, &'static str>> =
    LazyLock::new(|| WELL_KNOWN.iter().copied().collect());

/// Why a service name could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("port {0} is not a valid TCP port")]
    InvalidPort(u64),
    #[error("no service known for port {0}")]
    NotFound(u16),
}

/// Look up the service name for a port.
///
/// The system database wins over the built-in table.
pub fn lookup(port: Port) -> Result<&'static str, LookupError> {
    let socket_port = port
        .to_socket_port()
        .ok_or(LookupError::InvalidPort(port.as_u64()))?;

    SYSTEM_SERVICES
        .get(&socket_port)
        .map(String::as_str)
        .or_else(|| PORT_SERVICES.get(&socket_port).copied())
        .ok_or(LookupError::NotFound(socket_port))
}

/// Service name for a port, or [`UNKNOWN_SERVICE`].
pub fn service_name(port: Port) -> &'static str {
    lookup(port).unwrap_or(UNKNOWN_SERVICE)
}

/// Read a services(5) file. An unreadable file yields an empty map.
fn load_services_file(path: &Path) -> HashMap<u16, String> {
    match fs::read_to_string(path) {
        Ok(content) => parse_services(&content),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "services database unavailable");
            HashMap::new()
        }
    }
}

/// Parse `name port/protocol [aliases...] [# comment]` lines, keeping TCP
/// entries. The first name listed for a port is kept.
fn parse_services(content: &str) -> HashMap<u16, String> {
    let mut services = HashMap::new();

    for line in content.lines() {
        let line = line.split('#').next().unwrap_or_default();
        let mut fields = line.split_whitespace();
        let (Some(name), Some(port_proto)) = (fields.next(), fields.next()) else {
            continue;
        };
        let Some((port, proto)) = port_proto.split_once('/') else {
            continue;
        };
        if !proto.eq_ignore_ascii_case("tcp") {
            continue;
        }
        if let Ok(port) = port.parse::<u16>() {
            services.entry(port).or_insert_with(|| name.to_string());
        }
    }

    services
}

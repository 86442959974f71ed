//! Static catalog of well-known ports and the services usually behind them.

/// Well-known port to service-label table. Iteration order is the defined
/// default scan order when no port spec is given.
///
/// Lookup misses are labelled "Unknown" by [`lookup`], never an error.
pub const COMMON_PORTS: &[(u16, &str)] = &[
    (20, "FTP (Data Transfer)"),
    (21, "FTP (Command Control)"),
    (22, "SSH"),
    (23, "Telnet"),
    (25, "SMTP"),
    (53, "DNS"),
    (67, "DHCP (Server)"),
    (68, "DHCP (Client)"),
    (69, "TFTP"),
    (80, "HTTP"),
    (90, "HTTP Alternate (Possible use to bypass firewall)"),
    (110, "POP3"),
    (119, "NNTP"),
    (123, "NTP"),
    (135, "Microsoft RPC"),
    (137, "NetBIOS Name Service"),
    (138, "NetBIOS Datagram Service"),
    (139, "NetBIOS Session Service"),
    (143, "IMAP"),
    (161, "SNMP"),
    (162, "SNMP Trap"),
    (389, "LDAP"),
    (443, "HTTPS"),
    (445, "Microsoft-DS (SMB)"),
    (465, "SMTPS"),
    (514, "Syslog"),
    (554, "RTSP"),
    (636, "LDAPS"),
    (993, "IMAPS"),
    (995, "POP3S"),
    (1025, "MSP (Microsoft RPC - EPMAP)"),
    (1149, "VPN"),
    (1433, "Microsoft SQL Server"),
    (1434, "Microsoft SQL Monitor"),
    (1521, "Oracle Database"),
    (1723, "PPTP"),
    (2049, "NFS"),
    (2181, "Apache ZooKeeper"),
    (2379, "etcd"),
    (2380, "etcd (Leader Communication)"),
    (3306, "MySQL"),
    (3389, "RDP"),
    (3690, "Subversion (SVN)"),
    (4040, "Spark Web UI"),
    (4369, "Erlang Port Mapper Daemon"),
    (5000, "HTTP Alternative (Common APIs)"),
    (5432, "PostgreSQL"),
    (5672, "RabbitMQ (AMQP)"),
    (5900, "VNC"),
    (5984, "CouchDB"),
    (6080, "OpenStack Horizon"),
    (6379, "Redis"),
    (6443, "Kubernetes API Server"),
    (6667, "IRC"),
    (7001, "WebLogic Server"),
    (8000, "HTTP Alternative"),
    (8080, "HTTP Alternative"),
    (8081, "HTTP Proxy Alternative"),
    (8443, "HTTPS Alternative"),
    (9000, "SonarQube"),
    (9092, "Apache Kafka"),
    (9200, "Elasticsearch"),
    (10000, "Webmin"),
    (11211, "Memcached"),
    (27017, "MongoDB"),
    (32400, "Plex"),
    (3333, "Ethereum Wallet RPC (Cryptocurrency)"),
    (4444, "Oracle WebLogic (often used by attackers for backdoors)"),
    (5555, "Android Debug Bridge (ADB)"),
    (6660, "Internet Relay Chat (IRC) - Often used by malware"),
    (8088, "CouchDB (admin interface)"),
    (8888, "HTTP Alt (possible backdoor)"),
    (9999, "Daemon Port (often used by malware)"),
    (10080, "HTTP (Common HTTP Proxy)"),
    (1080, "SOCKS Proxy"),
    (15000, "Nessus (Vulnerability Scanner)"),
    (20000, "Webmin (Admin Panel)"),
    (31337, "Back Orifice (Remote Admin Tool)"),
    (33333, "Backup Exec (Admin Panel)"),
    (44444, "Backdoor (Possible use by hackers)"),
    (55555, "Possible backdoor (can be used by hackers)"),
];

/// Returns the service label for a well-known port, or "Unknown".
#[must_use]
pub fn lookup(port: u16) -> &'static str {
    COMMON_PORTS
        .iter()
        .find(|&&(p, _)| p == port)
        .map_or("Unknown", |&(_, name)| name)
}

/// The catalog's port numbers in table order, used as the default port set.
#[must_use]
pub fn default_ports() -> Vec<u16> {
    COMMON_PORTS.iter().map(|&(p, _)| p).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_port_has_label() {
        assert_eq!(lookup(22), "SSH");
        assert_eq!(lookup(443), "HTTPS");
    }

    #[test]
    fn unknown_port_is_labelled_unknown() {
        assert_eq!(lookup(4), "Unknown");
        assert_eq!(lookup(65535), "Unknown");
    }

    #[test]
    fn default_ports_follow_table_order() {
        let ports = default_ports();
        assert_eq!(ports.len(), COMMON_PORTS.len());
        assert_eq!(ports[0], 20);
        assert!(ports.iter().all(|&p| p >= 1));
    }
}

//! End-to-end flow through the library: validate, probe, aggregate, save.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use portprobe::input;
use portprobe::probe::PortStatus;
use portprobe::scanner::Scanner;
use portprobe::target;

const CONNECT: Duration = Duration::from_millis(500);
const BANNER: Duration = Duration::from_millis(500);

#[tokio::test]
async fn full_scan_against_local_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let open_port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };
            let _ = stream.write_all(b"SSH-2.0-OpenSSH_9.6\r\n").await;
        }
    });

    let target = target::resolve("127.0.0.1").await.unwrap();
    let ports = input::parse_port_spec(&format!("{open_port},1")).unwrap();
    assert_eq!(ports.len(), 2);

    let scanner = Scanner::new(target, ports, 10, CONNECT, BANNER, true);
    let report = scanner.run().await;

    assert_eq!(report.results.len(), 2);
    assert_eq!(report.open_ports(), vec![open_port]);

    let open = report
        .results
        .iter()
        .find(|r| r.port == open_port)
        .unwrap();
    assert_eq!(open.status, PortStatus::Open);
    assert_eq!(open.banner.as_deref(), Some("SSH-2.0-OpenSSH_9.6"));
    assert!(open.service.is_some());
}

#[tokio::test]
async fn validation_failures_stop_before_any_probe() {
    assert!(target::resolve("host.that.cannot.possibly.exist.invalid")
        .await
        .is_err());
    assert!(input::parse_port_spec("500-100").is_err());
}

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use bytes::Bytes;
use tokio::net::UdpSocket;

use concentrator_core::protocol::{decode_datagram, Inbound};
use concentrator_core::ErrorKind;
use concentrator_tools::sim::{default_devices, interlock_period, run_device, Device, ReadingSource};

#[test]
fn reference_table_covers_the_port_band() {
    let devices = default_devices();
    let ports: Vec<u16> = devices.iter().map(|d| d.port).collect();
    assert_eq!(ports, (9217..=9224).collect::<Vec<u16>>());
    assert_eq!(devices[0].id, 101);
    assert_eq!(devices[3].interval, Duration::from_millis(200));
}

#[test]
fn readings_decode_near_the_mean() {
    let device = &default_devices()[2]; // 12.4 +- 0.1
    let mut source = ReadingSource::new(device, Some(3)).unwrap();
    for _ in 0..100 {
        let Inbound::Metric(m) = decode_datagram(source.next_packet(device.id), device.port).unwrap()
        else {
            panic!("expected metric");
        };
        assert_eq!(m.identifier, "0067");
        assert!((m.value - 12.4).abs() < 1.0, "value={}", m.value);
    }
}

#[test]
fn bad_distribution_is_rejected() {
    let mut device = default_devices()[0].clone();
    device.std_dev = -1.0;
    let err = ReadingSource::new(&device, Some(1)).err().expect("must fail");
    assert_eq!(err.kind(), ErrorKind::Config);
}

#[tokio::test]
async fn device_sends_readings_and_heartbeats() {
    let localhost = IpAddr::V4(Ipv4Addr::LOCALHOST);
    let sink = UdpSocket::bind((localhost, 0)).await.unwrap();
    let port = sink.local_addr().unwrap().port();

    let device = Device {
        port,
        id: 0x0065,
        mean: 3.125,
        std_dev: 0.0,
        interval: Duration::from_millis(20),
    };
    let task = tokio::spawn(run_device(
        device,
        localhost,
        0,
        Some(Duration::from_millis(30)),
    ));

    let mut saw_metric = false;
    let mut saw_heartbeat = false;
    let mut buf = [0u8; 64];
    for _ in 0..20 {
        let (len, _) = tokio::time::timeout(Duration::from_secs(2), sink.recv_from(&mut buf))
            .await
            .expect("datagram in time")
            .unwrap();
        match decode_datagram(Bytes::copy_from_slice(&buf[..len]), port).unwrap() {
            Inbound::Metric(m) => {
                assert_eq!(m.value, 3.125);
                saw_metric = true;
            }
            Inbound::Heartbeat(_) => saw_heartbeat = true,
        }
        if saw_metric && saw_heartbeat {
            break;
        }
    }
    task.abort();
    assert!(saw_metric && saw_heartbeat);
}

#[test]
fn interlock_period_accepts_positive_seconds() {
    assert_eq!(interlock_period(5.0).unwrap(), Duration::from_secs(5));
    assert_eq!(interlock_period(0.25).unwrap(), Duration::from_millis(250));
}

#[test]
fn interlock_period_rejects_values_that_cannot_drive_a_timer() {
    // 1e-12 rounds to a zero-length period; 1e30 overflows Duration
    for secs in [0.0, -1.0, 1e-12, 1e30, f64::NAN, f64::INFINITY] {
        let err = interlock_period(secs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "secs={secs}");
    }
}

//! Integration tests for the channel over real transports.
//!
//! The TCP and UNIX tests run a small peer on a loopback listener; the
//! process tests use `cat`, which echoes whatever the channel writes.

use matfeap_channel::{Channel, Endpoint, Error, TransportKind};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpListener;

/// Listen on an ephemeral loopback port and run `peer` on the first connection.
async fn tcp_peer<F, Fut>(peer: F) -> (u16, tokio::task::JoinHandle<()>)
where
    F: FnOnce(tokio::net::TcpStream) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        peer(stream).await;
    });
    (port, handle)
}

#[tokio::test]
async fn test_send_reaches_peer_without_newline() {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let (port, peer) = tcp_peer(|stream| async move {
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        tx.send(line).unwrap();
    })
    .await;

    let mut channel = Channel::connect_tcp("127.0.0.1", port).await.unwrap();
    assert_eq!(channel.transport_kind(), TransportKind::Tcp);
    channel.send("hello").await.unwrap();

    assert_eq!(rx.await.unwrap(), "hello\n");
    peer.await.unwrap();
    channel.close().await.unwrap();
}

#[tokio::test]
async fn test_request_reply_over_tcp() {
    let (port, peer) = tcp_peer(|stream| async move {
        let (read, mut write) = stream.into_split();
        let mut reader = BufReader::new(read);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        write
            .write_all(format!("got {}", line).as_bytes())
            .await
            .unwrap();
        // Echo back the six doubles that follow the command.
        let mut raw = [0u8; 48];
        reader.read_exact(&mut raw).await.unwrap();
        write.write_all(&raw).await.unwrap();
    })
    .await;

    let mut channel = Channel::connect_tcp("localhost", port).await.unwrap();
    channel.send("tang").await.unwrap();
    assert_eq!(channel.read_line().await.unwrap(), "got tang");

    let values = [0.0, -0.0, 1.5, f64::MAX, f64::MIN_POSITIVE, -1234.5678e-90];
    channel.write_float_array(&values).await.unwrap();
    let echoed = channel.read_float_array(values.len()).await.unwrap();
    assert_eq!(
        echoed.iter().map(|v| v.to_bits()).collect::<Vec<_>>(),
        values.iter().map(|v| v.to_bits()).collect::<Vec<_>>()
    );

    peer.await.unwrap();
    channel.close().await.unwrap();
}

#[tokio::test]
async fn test_one_point_zero_is_big_endian_on_the_wire() {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let (port, peer) = tcp_peer(|mut stream| async move {
        let mut raw = [0u8; 8];
        stream.read_exact(&mut raw).await.unwrap();
        tx.send(raw).unwrap();
    })
    .await;

    let mut channel = Channel::connect_tcp("127.0.0.1", port).await.unwrap();
    channel.write_float_array(&[1.0]).await.unwrap();

    assert_eq!(rx.await.unwrap(), [0x3f, 0xf0, 0, 0, 0, 0, 0, 0]);
    peer.await.unwrap();
}

#[tokio::test]
async fn test_unterminated_line_is_stream_closed() {
    let (port, peer) = tcp_peer(|mut stream| async move {
        stream.write_all(b"no newline here").await.unwrap();
    })
    .await;

    let mut channel = Channel::connect_tcp("127.0.0.1", port).await.unwrap();
    peer.await.unwrap();

    let err = channel.read_line().await.unwrap_err();
    assert!(matches!(err, Error::StreamClosed(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_short_int_array_is_stream_closed() {
    let (port, peer) = tcp_peer(|mut stream| async move {
        stream.write_all(&[0u8; 12]).await.unwrap();
    })
    .await;

    let mut channel = Channel::connect_tcp("127.0.0.1", port).await.unwrap();
    peer.await.unwrap();

    let err = channel.read_int_array(5).await.unwrap_err();
    assert!(matches!(err, Error::StreamClosed(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_refused_port_is_connection_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = Channel::connect_tcp("127.0.0.1", port).await.unwrap_err();
    match err {
        Error::Connection { addr, .. } => assert_eq!(addr, format!("127.0.0.1:{}", port)),
        other => panic!("Expected Connection error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_open_dispatches_on_endpoint() {
    let (port, peer) = tcp_peer(|mut stream| async move {
        stream.write_all(b"ready\n").await.unwrap();
    })
    .await;

    let mut channel = Channel::open(&Endpoint::tcp("127.0.0.1", port)).await.unwrap();
    assert_eq!(channel.read_line().await.unwrap(), "ready");
    peer.await.unwrap();
    channel.close().await.unwrap();
}

#[cfg(unix)]
#[tokio::test]
async fn test_unix_socket_round_trip() {
    use tokio::net::UnixListener;

    let path = std::env::temp_dir().join(format!("matfeap-{}.sock", uuid::Uuid::new_v4()));
    let listener = UnixListener::bind(&path).unwrap();
    let peer = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (read, mut write) = stream.into_split();
        let mut reader = BufReader::new(read);
        let mut raw = [0u8; 12];
        reader.read_exact(&mut raw).await.unwrap();
        write.write_all(&raw).await.unwrap();
        write.write_all(b"done\n").await.unwrap();
    });

    let mut channel = Channel::connect_unix(&path).await.unwrap();
    assert_eq!(channel.transport_kind(), TransportKind::Unix);

    channel.write_int_array(&[i32::MIN, 0, i32::MAX]).await.unwrap();
    assert_eq!(
        channel.read_int_array(3).await.unwrap(),
        vec![i32::MIN, 0, i32::MAX]
    );
    assert_eq!(channel.read_line().await.unwrap(), "done");

    peer.await.unwrap();
    channel.close().await.unwrap();
    let _ = std::fs::remove_file(&path);
}

#[cfg(unix)]
#[tokio::test]
async fn test_missing_unix_socket_is_connection_error() {
    let path = std::env::temp_dir().join(format!("matfeap-{}.sock", uuid::Uuid::new_v4()));
    let err = Channel::connect_unix(&path).await.unwrap_err();
    assert!(matches!(err, Error::Connection { .. }), "got {:?}", err);
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_echo() {
    let mut channel = Channel::spawn("cat").await.unwrap();
    assert_eq!(channel.transport_kind(), TransportKind::Process);
    assert!(channel.id().is_some());

    channel.send("hello").await.unwrap();
    assert_eq!(channel.read_line().await.unwrap(), "hello");

    let floats: Vec<f64> = (0..100).map(|i| i as f64 / 7.0).collect();
    channel.write_float_array(&floats).await.unwrap();
    assert_eq!(channel.read_float_array(floats.len()).await.unwrap(), floats);

    let ints: Vec<i32> = (-50..50).map(|i| i * 1_000_003).collect();
    channel.write_int_array(&ints).await.unwrap();
    assert_eq!(channel.read_int_array(ints.len()).await.unwrap(), ints);

    channel.write_truncated_int_array(&[3.99, -3.99]).await.unwrap();
    assert_eq!(channel.read_int_array(2).await.unwrap(), vec![3, -3]);

    channel.close().await.unwrap();
    assert!(!channel.is_open());
    assert_eq!(channel.id(), None);
    assert!(channel.send("again").await.unwrap_err().is_stream_closed());
}

#[cfg(unix)]
#[tokio::test]
async fn test_process_with_arguments() {
    let mut channel = Channel::spawn("echo  one\ttwo").await.unwrap();
    assert_eq!(channel.read_line().await.unwrap(), "one two");

    // echo has exited; nothing more is coming.
    let err = channel.read_line().await.unwrap_err();
    assert!(err.is_stream_closed(), "got {:?}", err);
    channel.close().await.unwrap();
}

#[tokio::test]
async fn test_missing_program_is_spawn_error() {
    let err = Channel::spawn("matfeap-no-such-server").await.unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }), "got {:?}", err);

    let err = Channel::spawn("").await.unwrap_err();
    assert!(matches!(err, Error::Spawn { .. }), "got {:?}", err);
}

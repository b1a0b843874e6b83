//! Console scripts against `cat`, which echoes everything the channel writes.

#![cfg(unix)]

use matfeap_channel::Channel;
use matfeap_console::{ConsoleError, run_script};

async fn run(script: &str) -> (Channel, Result<usize, ConsoleError>, String) {
    let mut channel = Channel::spawn("cat").await.unwrap();
    let mut output = Vec::new();
    let result = run_script(&mut channel, script.as_bytes(), &mut output).await;
    (channel, result, String::from_utf8(output).unwrap())
}

#[tokio::test]
async fn test_script_round_trip() {
    let script = "\
# lines come straight back
send hello world
readln
writei 1 -2 3
readi 3
writed 0.5 -1e3
readd 2
";
    let (channel, result, output) = run(script).await;
    assert_eq!(result.unwrap(), 6);
    assert_eq!(output, "hello world\n1 -2 3\n0.5 -1000\n");
    assert!(!channel.is_open(), "end of input closes the channel");
}

#[tokio::test]
async fn test_close_stops_the_script() {
    let (channel, result, output) = run("send a\nreadln\nclose\nreadln\n").await;
    assert_eq!(result.unwrap(), 3);
    assert_eq!(output, "a\n");
    assert!(!channel.is_open());
}

#[tokio::test]
async fn test_parse_error_reports_line() {
    let (mut channel, result, _) = run("send a\n\nbogus 1\n").await;
    match result {
        Err(ConsoleError::Parse { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("bogus"));
        }
        other => panic!("Expected Parse error, got {:?}", other),
    }
    assert!(channel.is_open());
    channel.close().await.unwrap();
}

//! Drive a channel from a script.

use matfeap_channel::Channel;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::error::{ConsoleError, Result};
use crate::script::{Directive, join_values};

/// Run every directive read from `input` against `channel`, printing results
/// to `output`.
///
/// Returns the number of directives executed. End of input closes the
/// channel. A failure stops the run and leaves the channel for the caller to
/// close.
pub async fn run_script<R, W>(channel: &mut Channel, input: R, output: &mut W) -> Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut line_no = 0;
    let mut executed = 0;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let directive = match Directive::parse(&line) {
            Ok(Some(directive)) => directive,
            Ok(None) => continue,
            Err(message) => {
                return Err(ConsoleError::Parse {
                    line: line_no,
                    message,
                });
            }
        };

        debug!(line = line_no, ?directive, "executing");
        executed += 1;
        if !execute(channel, directive, output).await? {
            info!("Script closed the channel at line {}", line_no);
            return Ok(executed);
        }
    }

    channel.close().await?;
    Ok(executed)
}

/// Execute one directive. Returns false once the channel has been closed.
async fn execute<W>(channel: &mut Channel, directive: Directive, output: &mut W) -> Result<bool>
where
    W: AsyncWrite + Unpin,
{
    match directive {
        Directive::Send(text) => channel.send(&text).await?,
        Directive::ReadLine => {
            let line = channel.read_line().await?;
            print_line(output, &line).await?;
        }
        Directive::ReadInts(count) => {
            let values = channel.read_int_array(count).await?;
            print_line(output, &join_values(&values)).await?;
        }
        Directive::ReadFloats(count) => {
            let values = channel.read_float_array(count).await?;
            print_line(output, &join_values(&values)).await?;
        }
        Directive::WriteInts(values) => channel.write_int_array(&values).await?,
        Directive::WriteFloats(values) => channel.write_float_array(&values).await?,
        Directive::Close => {
            channel.close().await?;
            return Ok(false);
        }
    }
    Ok(true)
}

async fn print_line<W: AsyncWrite + Unpin>(output: &mut W, line: &str) -> Result<()> {
    output.write_all(line.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

//! One-shot CLI commands for poking at an AbletonOSC endpoint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use liveosc::{Correlator, OscArg, OscEndpoints, UdpTransport};

/// Probe `/test` once and report the round-trip time.
pub async fn ping(endpoints: OscEndpoints, timeout: Duration) -> Result<()> {
    let (transport, correlator) = open(endpoints.clone()).await?;

    let started = Instant::now();
    let pending = correlator.expect_response("/test");
    transport.send("/test", &[]).await?;
    let outcome = pending.wait(timeout).await;
    transport.disconnect().await;

    match outcome {
        Ok(args) => {
            println!(
                "reply from {} in {:?}: {}",
                endpoints.send_addr(),
                started.elapsed(),
                format_args_list(&args)
            );
            Ok(())
        }
        Err(e) => bail!("no reply from {}: {}", endpoints.send_addr(), e),
    }
}

/// Send a raw OSC message; waits for one same-address reply and prints it
/// (or notes the silence - plenty of addresses are fire-and-forget).
pub async fn send_raw(
    endpoints: OscEndpoints,
    address: &str,
    raw_args: &[String],
    timeout: Duration,
) -> Result<()> {
    let args: Vec<OscArg> = raw_args.iter().map(|s| parse_arg(s)).collect();
    let (transport, correlator) = open(endpoints).await?;

    let pending = correlator.expect_response(address);
    transport.send(address, &args).await.context("send failed")?;

    match pending.wait(timeout).await {
        Ok(reply) => println!("{address} -> {}", format_args_list(&reply)),
        Err(_) => println!("{address} -> (no reply)"),
    }
    transport.disconnect().await;
    Ok(())
}

async fn open(endpoints: OscEndpoints) -> Result<(Arc<UdpTransport>, Correlator)> {
    let transport = Arc::new(UdpTransport::new());
    let correlator = Correlator::new();
    let dispatch = correlator.clone();
    transport.set_handler(Arc::new(move |addr, args| dispatch.handle_response(&addr, args)));
    transport
        .connect(endpoints)
        .await
        .context("could not open OSC sockets (is the receive port free?)")?;
    Ok((transport, correlator))
}

/// CLI argument literals: int, then float, then true/false, else string.
fn parse_arg(s: &str) -> OscArg {
    if let Ok(i) = s.parse::<i32>() {
        return OscArg::Int(i);
    }
    if let Ok(f) = s.parse::<f32>() {
        return OscArg::Float(f);
    }
    match s {
        "true" | "T" => OscArg::Bool(true),
        "false" | "F" => OscArg::Bool(false),
        _ => OscArg::Str(s.to_string()),
    }
}

fn format_args_list(args: &[OscArg]) -> String {
    if args.is_empty() {
        return "(empty)".to_string();
    }
    let rendered: Vec<String> = args
        .iter()
        .map(|a| match a {
            OscArg::Int(i) => i.to_string(),
            OscArg::Float(f) => f.to_string(),
            OscArg::Str(s) => format!("{s:?}"),
            OscArg::Blob(b) => format!("<{} bytes>", b.len()),
            OscArg::Bool(b) => b.to_string(),
        })
        .collect();
    rendered.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_parse_in_priority_order() {
        assert_eq!(parse_arg("3"), OscArg::Int(3));
        assert_eq!(parse_arg("-1"), OscArg::Int(-1));
        assert_eq!(parse_arg("0.5"), OscArg::Float(0.5));
        assert_eq!(parse_arg("true"), OscArg::Bool(true));
        assert_eq!(parse_arg("Bass"), OscArg::Str("Bass".into()));
    }

    #[test]
    fn args_render_readably() {
        let rendered = format_args_list(&[
            OscArg::Int(0),
            OscArg::Float(0.5),
            OscArg::Str("kick".into()),
            OscArg::Bool(false),
        ]);
        assert_eq!(rendered, "0 0.5 \"kick\" false");
    }
}

//! External host process over stdin/stdout JSON lines.

use anyhow::{Context, Result};
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

use super::protocol::{decode_reply, encode_request, RequestKind, WireReply};
use super::{GatewayError, GatewayReply, GatewayRequest, HostGateway, RequestId};
use crate::{lock_or_recover, log_debug, log_debug_content};

type Pending = Arc<Mutex<HashMap<u64, RequestKind>>>;

/// Talks to a host command that reads requests on stdin and writes replies on
/// stdout, one JSON object per line.
pub struct StdioGateway {
    child: Child,
    stdin: ChildStdin,
    pending: Pending,
}

impl StdioGateway {
    pub fn spawn(program: &str, args: &[String], replies: Sender<GatewayReply>) -> Result<Self> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("failed to start host command '{program}'"))?;
        let stdin = child.stdin.take().context("host stdin unavailable")?;
        let stdout = child.stdout.take().context("host stdout unavailable")?;
        let pending: Pending = Arc::new(Mutex::new(HashMap::new()));

        let reader_pending = Arc::clone(&pending);
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        log_debug(&format!("host stdout read error: {err}"));
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                let Some(reply) = interpret_line(&line, &reader_pending) else {
                    continue;
                };
                if replies.send(reply).is_err() {
                    return;
                }
            }
            // Host went away: nothing still pending will ever be answered.
            let orphaned: Vec<u64> = lock_or_recover(&reader_pending, "stdio gateway drain")
                .drain()
                .map(|(id, _)| id)
                .collect();
            for id in orphaned {
                let _ = replies.send(GatewayReply::err(
                    RequestId(id),
                    GatewayError::Unavailable("host process exited".to_string()),
                ));
            }
            log_debug("host stdout closed");
        });

        Ok(Self {
            child,
            stdin,
            pending,
        })
    }
}

/// Resolve one host line against the pending table. Any line carrying a
/// pending id answers that request: undecodable payloads become `Malformed`
/// so the caller is never left waiting on a reply that already arrived.
fn interpret_line(line: &str, pending: &Pending) -> Option<GatewayReply> {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(err) => {
            log_debug(&format!("skipping unparseable host line: {err}"));
            log_debug_content(&format!("host line: {line}"));
            return None;
        }
    };
    let Some(raw_id) = value.get("id").and_then(serde_json::Value::as_u64) else {
        log_debug("skipping host line without a request id");
        log_debug_content(&format!("host line: {line}"));
        return None;
    };
    let kind = lock_or_recover(pending, "stdio gateway reply").remove(&raw_id);
    let Some(kind) = kind else {
        log_debug(&format!("host replied to unknown request #{raw_id}"));
        return None;
    };
    let id = RequestId(raw_id);
    let result = match serde_json::from_value::<WireReply>(value) {
        Ok(reply) => decode_reply(kind, reply),
        Err(err) => {
            log_debug(&format!("host reply {id} to {kind:?} is malformed: {err}"));
            log_debug_content(&format!("host line: {line}"));
            Err(GatewayError::Malformed(format!("unreadable reply: {err}")))
        }
    };
    Some(GatewayReply { id, result })
}

impl HostGateway for StdioGateway {
    fn submit(&mut self, id: RequestId, request: GatewayRequest) -> Result<(), GatewayError> {
        let kind = request.kind();
        let line = encode_request(id, &request)
            .map_err(|err| GatewayError::Unavailable(format!("encode failed: {err}")))?;
        if kind.expects_reply() {
            lock_or_recover(&self.pending, "stdio gateway submit").insert(id.0, kind);
        }
        let written = writeln!(self.stdin, "{line}").and_then(|_| self.stdin.flush());
        if let Err(err) = written {
            lock_or_recover(&self.pending, "stdio gateway submit").remove(&id.0);
            return Err(GatewayError::Unavailable(format!("write to host failed: {err}")));
        }
        Ok(())
    }
}

impl Drop for StdioGateway {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

use std::sync::mpsc;

use keysnap_core::Command;

use crate::ipc::PipeServer;

use super::daemon_types::{DaemonMsg, ResponseSender};

/// Serves one CLI connection at a time and forwards each command to the
/// daemon thread. Returns after answering `Stop`.
pub(super) fn ipc_loop(tx: mpsc::Sender<DaemonMsg>) {
    loop {
        let server = match PipeServer::create() {
            Ok(s) => s,
            Err(e) => {
                log::error!("failed to create pipe: {e}");
                return;
            }
        };

        let command = match server.accept_command() {
            Ok(cmd) => cmd,
            Err(e) => {
                log::warn!("error reading command: {e}");
                continue;
            }
        };
        log::debug!("IPC command: {command:?}");

        let (reply_tx, reply_rx): (ResponseSender, _) = mpsc::channel();
        if tx.send(DaemonMsg::Command(command, reply_tx)).is_err() {
            return;
        }

        if let Ok(response) = reply_rx.recv()
            && let Err(e) = server.send_response(&response)
        {
            log::warn!("failed to send response: {e}");
        }

        if command == Command::Stop {
            return;
        }
    }
}

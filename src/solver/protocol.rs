//! Coordinator/worker message protocol
//!
//! Each worker is paired with exactly one dispatch thread over a private
//! channel pair. Commands flow down, replies flow up; nodes are moved across
//! the channel so the receiving side owns its copy outright.

use crate::error::ProtocolError;
use crate::search::SearchNode;
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::trace;

/// Sent by a dispatch thread to its worker
#[derive(Debug)]
pub enum WorkerCommand {
    /// Expand every node in the batch
    Expand(Vec<SearchNode>),

    /// Stop; the worker must answer with [`WorkerReply::Terminated`]
    Terminate,
}

/// Sent by a worker to its dispatch thread
#[derive(Debug)]
pub enum WorkerReply {
    /// Concatenated children of an expanded batch
    Children(Vec<SearchNode>),

    /// Termination acknowledgement; the worker has exited its loop
    Terminated,
}

/// Dispatch-side half of a link
#[derive(Debug)]
pub struct WorkerLink {
    id: usize,
    commands: Sender<WorkerCommand>,
    replies: Receiver<WorkerReply>,
}

/// Worker-side half of a link
#[derive(Debug)]
pub struct WorkerEndpoint {
    id: usize,
    commands: Receiver<WorkerCommand>,
    replies: Sender<WorkerReply>,
}

/// Create the two halves of the link for worker `id`
pub fn link(id: usize) -> (WorkerLink, WorkerEndpoint) {
    let (cmd_tx, cmd_rx) = bounded(1);
    let (reply_tx, reply_rx) = bounded(1);
    (
        WorkerLink {
            id,
            commands: cmd_tx,
            replies: reply_rx,
        },
        WorkerEndpoint {
            id,
            commands: cmd_rx,
            replies: reply_tx,
        },
    )
}

impl WorkerLink {
    /// Worker this link talks to
    pub fn id(&self) -> usize {
        self.id
    }

    /// Send a batch and block for the worker's reply
    pub fn expand(&self, batch: Vec<SearchNode>) -> Result<WorkerReply, ProtocolError> {
        self.commands
            .send(WorkerCommand::Expand(batch))
            .map_err(|_| ProtocolError::CommandChannelClosed { id: self.id })?;
        self.replies
            .recv()
            .map_err(|_| ProtocolError::ReplyChannelClosed { id: self.id })
    }

    /// Send a termination command and block until it is acknowledged,
    /// discarding any other reply that arrives first
    pub fn terminate(&self) -> Result<(), ProtocolError> {
        self.commands
            .send(WorkerCommand::Terminate)
            .map_err(|_| ProtocolError::CommandChannelClosed { id: self.id })?;
        loop {
            match self.replies.recv() {
                Ok(WorkerReply::Terminated) => return Ok(()),
                Ok(WorkerReply::Children(children)) => {
                    trace!(
                        worker = self.id,
                        discarded = children.len(),
                        "Discarding reply while draining"
                    );
                }
                Err(_) => return Err(ProtocolError::ReplyChannelClosed { id: self.id }),
            }
        }
    }
}

impl WorkerEndpoint {
    /// Worker this endpoint belongs to
    pub fn id(&self) -> usize {
        self.id
    }

    /// Block for the next command
    pub fn recv(&self) -> Result<WorkerCommand, ProtocolError> {
        self.commands
            .recv()
            .map_err(|_| ProtocolError::CoordinatorGone { id: self.id })
    }

    /// Send a reply to the dispatch thread
    pub fn reply(&self, reply: WorkerReply) -> Result<(), ProtocolError> {
        self.replies
            .send(reply)
            .map_err(|_| ProtocolError::CoordinatorGone { id: self.id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{ConstraintSet, Partition};
    use std::thread;

    fn node() -> SearchNode {
        SearchNode::new(Partition::new(3), ConstraintSet::new(), 1, 2, 0)
    }

    #[test]
    fn test_expand_round_trip() {
        let (link, endpoint) = link(0);
        let worker = thread::spawn(move || {
            let WorkerCommand::Expand(batch) = endpoint.recv().unwrap() else {
                panic!("expected expand");
            };
            endpoint
                .reply(WorkerReply::Children(batch.into_iter().chain([node()]).collect()))
                .unwrap();
        });

        match link.expand(vec![node()]).unwrap() {
            WorkerReply::Children(children) => assert_eq!(children.len(), 2),
            other => panic!("unexpected {other:?}"),
        }
        worker.join().unwrap();
    }

    #[test]
    fn test_terminate_waits_for_ack() {
        let (link, endpoint) = link(1);
        let worker = thread::spawn(move || {
            assert!(matches!(endpoint.recv().unwrap(), WorkerCommand::Terminate));
            // A stale reply ahead of the acknowledgement is skipped
            endpoint.reply(WorkerReply::Children(vec![node()])).unwrap();
            endpoint.reply(WorkerReply::Terminated).unwrap();
        });
        link.terminate().unwrap();
        worker.join().unwrap();
    }

    #[test]
    fn test_dropped_worker_is_protocol_error() {
        let (link, endpoint) = link(2);
        drop(endpoint);
        assert!(matches!(
            link.expand(vec![node()]),
            Err(ProtocolError::CommandChannelClosed { id: 2 })
        ));
        assert!(link.terminate().is_err());
    }

    #[test]
    fn test_dropped_coordinator() {
        let (link, endpoint) = link(3);
        drop(link);
        assert!(matches!(
            endpoint.recv(),
            Err(ProtocolError::CoordinatorGone { id: 3 })
        ));
    }
}

//! Trial lifecycle: connect, reset, measure, reset, close.

use std::{fmt, time::Duration};

use tokio::time;
use tonic::{
    transport::{Channel, Endpoint},
    Code, Status,
};
use tracing::warn;

use crate::{
    field::FieldSpec,
    pb::{self, search_client::SearchClient},
    request,
    sequence::Sequence,
};

/// Prefix bytes identifying the benchmark's logical index.
const INDEX_PREFIX: [u8; 3] = [1, 2, 3];

/// Bound on graceful teardown at the end of a trial.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Reasons a trial fails to start. Both are fatal; the trial produces no
/// measurements.
#[derive(Debug)]
pub enum TrialError {
    /// The transport connection could not be established.
    Connect(tonic::transport::Error),
    /// The initial index reset failed for a reason other than the index
    /// being absent.
    Reset(Status),
}

impl fmt::Display for TrialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrialError::Connect(err) => {
                write!(f, "failed to connect to the search service: {}", err)
            }
            TrialError::Reset(status) => {
                write!(f, "failed to reset the benchmark index: {}", status)
            }
        }
    }
}

impl std::error::Error for TrialError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrialError::Connect(err) => Some(err),
            TrialError::Reset(status) => Some(status),
        }
    }
}

/// One measurement run against the service.
///
/// Owns the connection and index handle for the duration of the run. Both are
/// read-only once the trial has started and may be shared across concurrent
/// iterations; the sequence counter is the only shared mutable state.
/// Ending the trial consumes it, so the connection and the cleanup obligation
/// are released together on every exit path.
#[derive(Debug)]
pub struct Trial {
    client: SearchClient<Channel>,
    index: pb::Index,
    sequence: Sequence,
}

impl Trial {
    /// Connects to the service at `addr` and clears any prior state for the
    /// benchmark index, so the run starts against an empty index with a fresh
    /// sequence counter.
    pub async fn start(addr: impl Into<String>) -> Result<Trial, TrialError> {
        let channel = Endpoint::from_shared(addr.into())
            .map_err(TrialError::Connect)?
            .connect()
            .await
            .map_err(TrialError::Connect)?;

        let mut client = SearchClient::new(channel);
        let index = pb::Index {
            prefix: INDEX_PREFIX.to_vec(),
        };
        delete_index(&mut client, &index)
            .await
            .map_err(TrialError::Reset)?;

        Ok(Trial {
            client,
            index,
            sequence: Sequence::default(),
        })
    }

    /// Submits one update request and blocks until the response arrives.
    ///
    /// The round trip is the unit of measurement: an RPC error is returned
    /// as-is as a failed iteration and never retried here.
    pub async fn run_one_iteration(&self) -> Result<(), Status> {
        let seq = self.sequence.next();
        let request = request::update_request(
            &self.index,
            seq,
            vec![FieldSpec::text("foo", "bar baz", true, false)],
        );

        // Cloning the client is cheap; concurrent iterations multiplex over
        // the one shared channel.
        let mut client = self.client.clone();
        client.update_document(request).await?;
        Ok(())
    }

    /// Clears the index one final time and closes the connection, waiting at
    /// most [`SHUTDOWN_TIMEOUT`] for the cleanup call. Teardown failures are
    /// logged, never propagated.
    pub async fn end(mut self) {
        match time::timeout(
            SHUTDOWN_TIMEOUT,
            delete_index(&mut self.client, &self.index),
        )
        .await
        {
            Ok(Ok(())) => {}
            Ok(Err(status)) => warn!("failed to clear index during teardown: {}", status),
            Err(_) => warn!("teardown did not finish within {:?}", SHUTDOWN_TIMEOUT),
        }
    }
}

/// Deletes the benchmark index, treating an absent index as success.
async fn delete_index(
    client: &mut SearchClient<Channel>,
    index: &pb::Index,
) -> Result<(), Status> {
    match client.delete_index(index.clone()).await {
        Ok(_) => Ok(()),
        Err(status) if status.code() == Code::NotFound => Ok(()),
        Err(status) => Err(status),
    }
}

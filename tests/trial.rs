use std::sync::{Arc, Mutex};

use index_bench::{
    pb::{
        field_value,
        search_server::{Search, SearchServer},
        DocumentUpdateRequest, Index, ServiceResponse,
    },
    trial::{Trial, TrialError},
};
use tokio::net::TcpListener;
use tonic::{transport::Server, Code, Request, Response, Status};

#[derive(Default)]
struct State {
    exists: bool,
    deletes: usize,
    updates: Vec<DocumentUpdateRequest>,
}

/// In-process stand-in for the indexing service, recording every call.
#[derive(Clone, Default)]
struct MockSearch {
    state: Arc<Mutex<State>>,
    fail_deletes: bool,
    fail_updates: bool,
}

#[tonic::async_trait]
impl Search for MockSearch {
    async fn delete_index(
        &self,
        _request: Request<Index>,
    ) -> Result<Response<ServiceResponse>, Status> {
        let mut state = self.state.lock().unwrap();
        state.deletes += 1;
        if self.fail_deletes {
            return Err(Status::internal("index writer unavailable"));
        }
        if !state.exists {
            return Err(Status::not_found("index does not exist"));
        }
        state.exists = false;
        Ok(Response::new(ServiceResponse::default()))
    }

    async fn update_document(
        &self,
        request: Request<DocumentUpdateRequest>,
    ) -> Result<Response<ServiceResponse>, Status> {
        let mut state = self.state.lock().unwrap();
        state.updates.push(request.into_inner());
        if self.fail_updates {
            return Err(Status::internal("index writer failed"));
        }
        state.exists = true;
        Ok(Response::new(ServiceResponse::default()))
    }
}

async fn spawn_server(svc: MockSearch) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(SearchServer::new(svc))
            .serve_with_incoming(tokio_stream::wrappers::TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    format!("http://{}", addr)
}

#[tokio::test]
async fn empty_trial_leaves_index_absent() {
    let svc = MockSearch::default();
    let state = Arc::clone(&svc.state);
    let addr = spawn_server(svc).await;

    let trial = Trial::start(addr).await.unwrap();
    trial.end().await;

    let state = state.lock().unwrap();
    assert_eq!(state.deletes, 2);
    assert!(!state.exists);
    assert!(state.updates.is_empty());
}

#[tokio::test]
async fn iterations_produce_sequenced_documents() {
    let svc = MockSearch::default();
    let state = Arc::clone(&svc.state);
    let addr = spawn_server(svc).await;

    let trial = Trial::start(addr).await.unwrap();
    for _ in 0..3 {
        trial.run_one_iteration().await.unwrap();
    }
    trial.end().await;

    let state = state.lock().unwrap();
    assert_eq!(state.updates.len(), 3);
    for (i, update) in state.updates.iter().enumerate() {
        let n = i as u64 + 1;
        assert_eq!(update.id, format!("doc{}", n));
        assert_eq!(update.seq.as_ref().unwrap().seq, format!("seq-{}", n));
        assert_eq!(update.index.as_ref().unwrap().prefix, [1, 2, 3]);

        assert_eq!(update.fields.len(), 1);
        let field = &update.fields[0];
        assert_eq!(field.name, "foo");
        assert_eq!(
            field.value.as_ref().unwrap().value,
            Some(field_value::Value::Text("bar baz".to_string()))
        );
        assert!(field.analyzed);
        assert!(field.stored);
        assert!(!field.facet);
    }
}

#[tokio::test]
async fn second_trial_restarts_the_sequence() {
    let svc = MockSearch::default();
    let state = Arc::clone(&svc.state);
    let addr = spawn_server(svc).await;

    let trial = Trial::start(addr.clone()).await.unwrap();
    trial.run_one_iteration().await.unwrap();
    trial.run_one_iteration().await.unwrap();
    trial.end().await;

    let trial = Trial::start(addr).await.unwrap();
    trial.run_one_iteration().await.unwrap();
    trial.end().await;

    let state = state.lock().unwrap();
    assert_eq!(state.updates.len(), 3);
    assert_eq!(state.updates[2].id, "doc1");
}

#[tokio::test]
async fn update_errors_propagate_without_retry() {
    let svc = MockSearch {
        fail_updates: true,
        ..MockSearch::default()
    };
    let state = Arc::clone(&svc.state);
    let addr = spawn_server(svc).await;

    let trial = Trial::start(addr).await.unwrap();
    let err = trial.run_one_iteration().await.unwrap_err();
    assert_eq!(err.code(), Code::Internal);

    // The failed call reached the service exactly once.
    assert_eq!(state.lock().unwrap().updates.len(), 1);

    trial.end().await;
}

#[tokio::test]
async fn reset_failure_is_fatal_to_the_trial() {
    let svc = MockSearch {
        fail_deletes: true,
        ..MockSearch::default()
    };
    let addr = spawn_server(svc).await;

    let err = Trial::start(addr).await.unwrap_err();
    assert!(matches!(err, TrialError::Reset(_)), "got {:?}", err);
}

#[tokio::test]
async fn connect_failure_is_fatal_to_the_trial() {
    let err = Trial::start("http://127.0.0.1:1").await.unwrap_err();
    assert!(matches!(err, TrialError::Connect(_)), "got {:?}", err);
}

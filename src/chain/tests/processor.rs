use std::sync::Arc;

use super::{BASE_URL, config, request, run_async_test, url};
use crate::chain::{PathExtractor, RequestProcessor, VariableResolver, VariableStore};
use crate::context::RunContext;
use crate::error::{AppError, ChainError, ContextError, HttpError};
use crate::http::test_support::MockClient;
use crate::http::{CONTENT_TYPE_JSON, DefaultRequestFactory, HttpClient};

fn processor(client: &Arc<MockClient>) -> RequestProcessor {
    let transport: Arc<dyn HttpClient> = client.clone();
    RequestProcessor::new(
        Arc::new(DefaultRequestFactory),
        transport,
        Arc::new(PathExtractor),
    )
}

#[test]
fn substitutes_variables_and_commits_extractions() -> Result<(), String> {
    run_async_test(async {
        let client = Arc::new(MockClient::new().reply(
            &url("/users/42"),
            201,
            r#"{"session":{"id":"s-1"}}"#,
        ));
        let mut spec = request("create", "POST", "/users/${user_id}");
        spec.headers = vec!["Authorization: Bearer ${token}".to_owned()];
        spec.json_body = Some(r#"{"owner":"${user_id}"}"#.to_owned());
        spec.extract.insert("session".to_owned(), "session.id".to_owned());
        let run = config(vec![spec.clone()]);

        let mut store = VariableStore::new();
        store.set("user_id", "42").map_err(|err| err.to_string())?;
        store.set("token", "t0k").map_err(|err| err.to_string())?;

        let result = processor(&client)
            .process_request(&RunContext::background(), &spec, &run, &mut store)
            .await
            .map_err(|err| err.to_string())?;
        if result.status_code != 201 || !result.success {
            return Err(format!("Unexpected result: {:?}", result));
        }
        if result.variables.get("session").map(String::as_str) != Some("s-1") {
            return Err(format!("Unexpected variables: {:?}", result.variables));
        }
        if store.get("session") != Some("s-1") {
            return Err("Extracted variable should be committed".to_owned());
        }

        let calls = client.calls();
        let sent = calls.first().ok_or("Expected one call")?;
        if sent.url != format!("{}/users/42", BASE_URL) {
            return Err(format!("Unexpected url: {}", sent.url));
        }
        if sent.header("Authorization") != Some("Bearer t0k") {
            return Err(format!("Unexpected headers: {:?}", sent.headers));
        }
        match sent.body.as_ref() {
            Some(body) if body.content == r#"{"owner":"42"}"# && body.content_type == CONTENT_TYPE_JSON => {
                Ok(())
            }
            other => Err(format!("Unexpected body: {:?}", other)),
        }
    })
}

#[test]
fn extraction_failure_keeps_status_and_commits_nothing() -> Result<(), String> {
    run_async_test(async {
        let client = Arc::new(MockClient::new().reply(&url("/login"), 401, r#"{"error":"denied"}"#));
        let mut spec = request("login", "POST", "/login");
        spec.extract.insert("error".to_owned(), "error".to_owned());
        spec.extract.insert("token".to_owned(), "auth.token".to_owned());
        let run = config(vec![spec.clone()]);
        let mut store = VariableStore::new();

        let outcome = processor(&client)
            .process_request(&RunContext::background(), &spec, &run, &mut store)
            .await;
        let err = match outcome {
            Err(err) => err,
            Ok(result) => return Err(format!("Expected failure, got {:?}", result)),
        };
        if err.status_code() != Some(401) {
            return Err(format!("Expected status 401 on error: {}", err));
        }
        if !matches!(
            err.root_cause(),
            AppError::Chain(ChainError::PathNotFound { .. })
        ) {
            return Err(format!("Unexpected root cause: {}", err.root_cause()));
        }
        if !store.is_empty() {
            return Err(format!("Nothing should be committed: {:?}", store.values()));
        }
        Ok(())
    })
}

#[test]
fn invalid_method_is_a_creation_error() -> Result<(), String> {
    run_async_test(async {
        let client = Arc::new(MockClient::new());
        let spec = request("odd", "BREW", "/coffee");
        let run = config(vec![spec.clone()]);
        let mut store = VariableStore::new();
        match processor(&client)
            .process_request(&RunContext::background(), &spec, &run, &mut store)
            .await
        {
            Err(AppError::Chain(ChainError::RequestCreation { source })) => {
                if !matches!(*source, AppError::Http(HttpError::InvalidMethod { .. })) {
                    return Err(format!("Unexpected source: {}", source));
                }
            }
            other => return Err(format!("Unexpected result: {:?}", other)),
        }
        if client.call_count() != 0 {
            return Err("Nothing should be sent".to_owned());
        }
        Ok(())
    })
}

#[test]
fn transport_failure_is_an_execution_error() -> Result<(), String> {
    run_async_test(async {
        let client = Arc::new(MockClient::new().fail(&url("/down")));
        let spec = request("down", "GET", "/down");
        let run = config(vec![spec.clone()]);
        let mut store = VariableStore::new();
        match processor(&client)
            .process_request(&RunContext::background(), &spec, &run, &mut store)
            .await
        {
            Err(AppError::Chain(ChainError::RequestExecution { .. })) => Ok(()),
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

#[test]
fn done_context_returns_before_sending() -> Result<(), String> {
    run_async_test(async {
        let client = Arc::new(MockClient::new());
        let spec = request("ping", "GET", "/ping");
        let run = config(vec![spec.clone()]);
        let ctx = RunContext::background();
        ctx.cancel();
        let mut store = VariableStore::new();
        match processor(&client)
            .process_request(&ctx, &spec, &run, &mut store)
            .await
        {
            Err(AppError::Context(ContextError::Cancelled)) => {}
            other => return Err(format!("Unexpected result: {:?}", other)),
        }
        if client.call_count() != 0 {
            return Err("Nothing should be sent".to_owned());
        }
        Ok(())
    })
}

#[test]
fn response_without_body_fails_extraction() -> Result<(), String> {
    run_async_test(async {
        let client = Arc::new(MockClient::new().reply_without_body(&url("/empty"), 204));
        let mut spec = request("empty", "GET", "/empty");
        spec.extract.insert("id".to_owned(), "id".to_owned());
        let run = config(vec![spec.clone()]);
        let mut store = VariableStore::new();

        let outcome = processor(&client)
            .process_request(&RunContext::background(), &spec, &run, &mut store)
            .await;
        match outcome {
            Err(AppError::Chain(ChainError::VariableExtraction { status: 204, source })) => {
                match source.as_ref() {
                    AppError::Chain(ChainError::NilResponse) => {}
                    other => return Err(format!("Unexpected source: {:?}", other)),
                }
            }
            other => return Err(format!("Unexpected outcome: {:?}", other)),
        }
        if !store.is_empty() {
            return Err("Nothing should be committed".to_owned());
        }
        Ok(())
    })
}

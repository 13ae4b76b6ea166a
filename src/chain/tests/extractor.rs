use std::collections::BTreeMap;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use super::run_async_test;
use crate::chain::limits::MAX_RESPONSE_BODY_BYTES;
use crate::chain::{JsonExtractor, PathExtractor, extract_variables};
use crate::context::RunContext;
use crate::error::{AppError, ChainError, ContextError};
use crate::http::HttpResponse;

const DOCUMENT: &str = r#"{
  "auth": { "token": "abc123", "expires": 3600, "admin": false },
  "items": [ { "id": 7 }, { "id": 9, "tags": ["a", "b"] } ],
  "nothing": null,
  "file.name": "report.pdf"
}"#;

struct BrokenReader;

impl AsyncRead for BrokenReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::other("connection reset")))
    }
}

fn extraction(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(name, path)| ((*name).to_owned(), (*path).to_owned()))
        .collect()
}

#[test]
fn path_extractor_renders_values() -> Result<(), String> {
    let cases = [
        ("auth.token", Some("abc123")),
        ("auth.expires", Some("3600")),
        ("auth.admin", Some("false")),
        ("items.1.id", Some("9")),
        ("items.1.tags", Some(r#"["a","b"]"#)),
        ("items.0", Some(r#"{"id":7}"#)),
        ("items.#", Some("2")),
        ("nothing", Some("")),
        (r"file\.name", Some("report.pdf")),
        ("auth.missing", None),
        ("items.5.id", None),
        ("auth.token.deeper", None),
        ("", None),
        ("auth..token", None),
    ];
    for (path, expected) in cases {
        let found = PathExtractor.extract(DOCUMENT, path);
        if found.as_deref() != expected {
            return Err(format!("Path '{}' gave {:?}, expected {:?}", path, found, expected));
        }
    }
    Ok(())
}

#[test]
fn path_extractor_keeps_number_text() -> Result<(), String> {
    let document = r#"{"a":1e3,"b":12345678901234567890123,"c":1.50,"d":-7,"e":2.5E-3}"#;
    let cases = [
        ("a", "1000"),
        ("b", "12345678901234567890123"),
        ("c", "1.5"),
        ("d", "-7"),
        ("e", "0.0025"),
    ];
    for (path, expected) in cases {
        let found = PathExtractor.extract(document, path);
        if found.as_deref() != Some(expected) {
            return Err(format!("Path '{}' gave {:?}, expected {}", path, found, expected));
        }
    }
    Ok(())
}

#[test]
fn path_extractor_projects_over_arrays() -> Result<(), String> {
    let cases = [
        ("items.#.id", Some("[7,9]")),
        ("items.#.tags", Some(r#"[["a","b"]]"#)),
        ("items.#.tags.#", Some("[2]")),
        ("items.#.missing", Some("[]")),
        ("auth.#.id", None),
    ];
    for (path, expected) in cases {
        let found = PathExtractor.extract(DOCUMENT, path);
        if found.as_deref() != expected {
            return Err(format!("Path '{}' gave {:?}, expected {:?}", path, found, expected));
        }
    }
    Ok(())
}

#[test]
fn path_extractor_rejects_non_json() -> Result<(), String> {
    if PathExtractor.extract("<html></html>", "auth").is_some() {
        return Err("Non-JSON text should not match".to_owned());
    }
    Ok(())
}

#[test]
fn extracts_all_variables_and_restores_body() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let mut response = HttpResponse::new(200, Vec::new(), DOCUMENT.as_bytes().to_vec());
        let wanted = extraction(&[("token", "auth.token"), ("first", "items.0.id")]);

        let variables = extract_variables(&ctx, &PathExtractor, &mut response, &wanted)
            .await
            .map_err(|err| err.to_string())?;
        if variables.get("token").map(String::as_str) != Some("abc123")
            || variables.get("first").map(String::as_str) != Some("7")
        {
            return Err(format!("Unexpected variables: {:?}", variables));
        }

        let body = response.text().await.map_err(|err| err.to_string())?;
        if body != DOCUMENT {
            return Err("Body should be readable again after extraction".to_owned());
        }
        Ok(())
    })
}

#[test]
fn missing_path_fails_the_whole_extraction() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let mut response = HttpResponse::new(200, Vec::new(), DOCUMENT.as_bytes().to_vec());
        let wanted = extraction(&[("token", "auth.token"), ("user", "data.user.id")]);
        match extract_variables(&ctx, &PathExtractor, &mut response, &wanted).await {
            Err(AppError::Chain(ChainError::PathNotFound { variable, path }))
                if variable == "user" && path == "data.user.id" =>
            {
                Ok(())
            }
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

#[test]
fn invalid_utf8_body_matches_no_path() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let mut body = br#"{"name":""#.to_vec();
        body.push(0xFF);
        body.extend_from_slice(br#""}"#);
        let mut response = HttpResponse::new(200, Vec::new(), body);
        let wanted = extraction(&[("name", "name")]);
        match extract_variables(&ctx, &PathExtractor, &mut response, &wanted).await {
            Err(AppError::Chain(ChainError::PathNotFound { variable, .. })) if variable == "name" => {
                Ok(())
            }
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

#[test]
fn missing_body_is_nil_response() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let mut response = HttpResponse::without_body(204);
        let wanted = extraction(&[("token", "auth.token")]);
        match extract_variables(&ctx, &PathExtractor, &mut response, &wanted).await {
            Err(AppError::Chain(ChainError::NilResponse)) => Ok(()),
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

#[test]
fn oversized_body_is_rejected() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let size = usize::try_from(MAX_RESPONSE_BODY_BYTES)
            .map_err(|err| err.to_string())?
            .saturating_add(1);
        let mut response = HttpResponse::new(200, Vec::new(), vec![b' '; size]);
        let wanted = extraction(&[("token", "auth.token")]);
        match extract_variables(&ctx, &PathExtractor, &mut response, &wanted).await {
            Err(AppError::Chain(ChainError::ResponseTooLarge { limit }))
                if limit == MAX_RESPONSE_BODY_BYTES =>
            {
                Ok(())
            }
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

#[test]
fn body_at_the_cap_is_accepted() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let size = usize::try_from(MAX_RESPONSE_BODY_BYTES).map_err(|err| err.to_string())?;
        let mut body = br#"{"ok":true}"#.to_vec();
        body.resize(size, b' ');
        let mut response = HttpResponse::new(200, Vec::new(), body);
        let wanted = extraction(&[("ok", "ok")]);
        let variables = extract_variables(&ctx, &PathExtractor, &mut response, &wanted)
            .await
            .map_err(|err| err.to_string())?;
        if variables.get("ok").map(String::as_str) != Some("true") {
            return Err(format!("Unexpected variables: {:?}", variables));
        }
        Ok(())
    })
}

#[test]
fn read_failure_is_reported() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        let mut response = HttpResponse::without_body(200);
        response.body = Some(Box::new(BrokenReader));
        let wanted = extraction(&[("token", "auth.token")]);
        match extract_variables(&ctx, &PathExtractor, &mut response, &wanted).await {
            Err(AppError::Chain(ChainError::ReadResponseBody { .. })) => Ok(()),
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

#[test]
fn cancelled_context_stops_extraction() -> Result<(), String> {
    run_async_test(async {
        let ctx = RunContext::background();
        ctx.cancel();
        let mut response = HttpResponse::new(200, Vec::new(), DOCUMENT.as_bytes().to_vec());
        let wanted = extraction(&[("token", "auth.token")]);
        match extract_variables(&ctx, &PathExtractor, &mut response, &wanted).await {
            Err(AppError::Context(ContextError::Cancelled)) => Ok(()),
            other => Err(format!("Unexpected result: {:?}", other)),
        }
    })
}

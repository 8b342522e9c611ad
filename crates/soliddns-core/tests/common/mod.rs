// Shared test transport: scripted responses plus a log of every request.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Mutex;

use soliddns_api::{Error, FormParams, RawResponse, Transport, Verb};

/// One request as the engine sent it.
#[derive(Debug, Clone)]
pub struct Call {
    pub verb: Verb,
    pub endpoint: String,
    pub params: FormParams,
}

type Handler = Box<dyn Fn(&Call) -> RawResponse + Send + Sync>;

/// A `Transport` that answers from a script, falling back to a handler.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<VecDeque<Result<RawResponse, Error>>>,
    handler: Option<Handler>,
    calls: Mutex<Vec<Call>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every unscripted request with `handler`.
    pub fn with_handler(handler: impl Fn(&Call) -> RawResponse + Send + Sync + 'static) -> Self {
        Self {
            handler: Some(Box::new(handler)),
            ..Self::default()
        }
    }

    /// Queue a response.
    pub fn respond(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, body)));
        self
    }

    /// Queue a transport failure.
    pub fn fail(self, err: Error) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.endpoint).collect()
    }

    pub fn last(&self) -> Call {
        self.calls().pop().expect("at least one request")
    }
}

impl Transport for FakeTransport {
    fn request(
        &self,
        verb: Verb,
        endpoint: &str,
        params: &FormParams,
    ) -> impl Future<Output = Result<RawResponse, Error>> + Send {
        let call = Call {
            verb,
            endpoint: endpoint.to_owned(),
            params: params.clone(),
        };

        let scripted = self.script.lock().unwrap().pop_front();
        let result = match scripted {
            Some(result) => result,
            None => match &self.handler {
                Some(handler) => Ok(handler(&call)),
                None => panic!("unexpected request: {verb} {endpoint}"),
            },
        };

        self.calls.lock().unwrap().push(call);
        async move { result }
    }
}

/// Field map for a DNS A record.
pub fn dns_config(name: &str) -> soliddns_core::EntityConfig {
    soliddns_core::EntityConfig::new()
        .with("server", "ns1.example.com")
        .with("name", name)
        .with("type", "a")
        .with("value", "10.0.0.1")
        .with("ttl", "3600")
}

/// Field map for an IPv6 alias in space `prod`.
pub fn alias_config() -> soliddns_core::EntityConfig {
    soliddns_core::EntityConfig::new()
        .with("space", "prod")
        .with("address", "2001:db8::1")
        .with("name", "v6.example.com")
}

//! Common test utilities.
//!
//! Import with `mod common;` in test files.

#![allow(dead_code)]

use crossmodel::error::{CrossModelError, CrossModelResult};
use crossmodel::model::{
    Endpoint, ModelTag, Relation, RelationKey, RemoteEntityToken, Role, Subnet,
};
use crossmodel::state::{
    Application, ApplicationRegistry, MemoryState, RelationRegistry, RemoteEntityRegistry,
    StringsWatcher, SubnetProvider, SubnetWatchSource,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

/// Model every test token is registered under.
pub const MODEL_UUID: &str = "deadbeef-0bad-400d-8000-4b1d0d06f00d";

pub fn model() -> ModelTag {
    ModelTag::parse(MODEL_UUID).expect("valid model uuid")
}

/// A recorded collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub args: Vec<String>,
}

impl Call {
    pub fn new(method: &'static str, args: &[&str]) -> Self {
        Self {
            method,
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// State double that records every call and can fail chosen methods.
#[derive(Default)]
pub struct MockState {
    pub inner: MemoryState,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, CrossModelError>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every call to `method` fail with `error`.
    pub fn fail(&self, method: &'static str, error: CrossModelError) {
        self.failures.lock().insert(method, error);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn reset_calls(&self) {
        self.calls.lock().clear();
    }

    #[track_caller]
    pub fn check_calls(&self, expected: &[Call]) {
        assert_eq!(self.calls(), expected);
    }

    fn record(&self, method: &'static str, args: Vec<String>) -> CrossModelResult<()> {
        self.calls.lock().push(Call { method, args });
        match self.failures.lock().get(method) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Register a relation, its token and (optionally) its local application.
    pub fn add_relation(&self, key: &str, token: &str, endpoints: Vec<Endpoint>) {
        let key = RelationKey::parse(key).expect("valid relation key");
        self.inner
            .add_relation(Relation::new(123, key.clone(), endpoints).expect("valid relation"));
        self.inner
            .register_remote_entity(
                model(),
                RemoteEntityToken::new(token).expect("valid token"),
                key,
            )
            .expect("token registered");
    }

    pub fn add_application(&self, name: &str) {
        self.inner.add_application(Application::new(name));
    }

    pub fn set_subnets(&self, cidrs: &[&str]) {
        for (i, cidr) in cidrs.iter().enumerate() {
            self.inner.add_subnet(Subnet::new((i + 1).to_string(), *cidr));
        }
    }
}

impl RemoteEntityRegistry for MockState {
    fn lookup(&self, model: &ModelTag, token: &RemoteEntityToken) -> CrossModelResult<RelationKey> {
        self.record(
            "GetRemoteEntity",
            vec![model.to_string(), token.to_string()],
        )?;
        self.inner.lookup(model, token)
    }
}

impl RelationRegistry for MockState {
    fn get_by_key(&self, key: &RelationKey) -> CrossModelResult<Relation> {
        self.record("KeyRelation", vec![key.to_string()])?;
        self.inner.get_by_key(key)
    }
}

impl ApplicationRegistry for MockState {
    fn get_by_name(&self, name: &str) -> CrossModelResult<Application> {
        self.record("Application", vec![name.to_string()])?;
        self.inner.get_by_name(name)
    }
}

impl SubnetProvider for MockState {
    fn list_all(&self) -> CrossModelResult<Vec<Subnet>> {
        self.record("AllSubnets", vec![])?;
        self.inner.list_all()
    }
}

impl SubnetWatchSource for MockState {
    fn watch_subnets(&self) -> CrossModelResult<StringsWatcher> {
        self.record("WatchSubnets", vec![])?;
        self.inner.watch_subnets()
    }
}

/// Endpoints of a relation where `requirer` consumes from `provider`.
pub fn db2_endpoints(requirer: &str, provider: &str) -> Vec<Endpoint> {
    vec![
        Endpoint::new(requirer, "db", "db2", Role::Requirer, 1),
        Endpoint::new(provider, "data", "db2", Role::Provider, 1),
    ]
}

/// Write `content` to a temp file.
pub fn temp_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write temp file");
    file
}

/// State fixture with one consuming and one offering relation.
pub fn fixture_content() -> String {
    format!(
        r#"
model_uuid = "{MODEL_UUID}"

[[applications]]
name = "django"

[[applications]]
name = "db2"

[[relations]]
id = 1
key = "remote-db2:db django:db"
token = "token-consume"
endpoints = [
  {{ application_name = "django", relation = {{ name = "db", interface = "db2", role = "requirer", limit = 1 }} }},
  {{ application_name = "remote-db2", relation = {{ name = "data", interface = "db2", role = "provider", limit = 1 }} }},
]

[[relations]]
id = 2
key = "db2:db remote-django:db"
token = "token-offer"
endpoints = [
  {{ application_name = "remote-django", relation = {{ name = "db", interface = "db2", role = "requirer", limit = 1 }} }},
  {{ application_name = "db2", relation = {{ name = "data", interface = "db2", role = "provider", limit = 1 }} }},
]

[[subnets]]
id = "1"
cidr = "10.0.0.0/24"

[[subnets]]
id = "2"
cidr = "0.0.0.0/0"
"#
    )
}

/// Assert that a result is Ok and return the value.
#[track_caller]
pub fn assert_ok<T, E: std::fmt::Debug>(result: Result<T, E>) -> T {
    match result {
        Ok(v) => v,
        Err(e) => panic!("Expected Ok, got Err: {:?}", e),
    }
}
